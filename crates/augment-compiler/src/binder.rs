//! Argument binding.
//!
//! Maps a call's source-order arguments onto a parameter list. The binder only
//! decides *where* each argument goes; every argument is still evaluated once,
//! in source order, by the lowered prelude. Slots refer back to arguments by
//! their source index.

use augment_core::{BindingError, ConstantValue, Param, Span};

use crate::site::Argument;

/// What fills one parameter slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundSlot {
    /// The argument at this source index.
    Arg(usize),
    /// The parameter's declared default.
    Default(ConstantValue),
    /// Extra positional arguments gathered into the variadic tail, in source order.
    Variadic(Vec<usize>),
}

/// One slot per declared parameter, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoundArguments {
    pub slots: Vec<BoundSlot>,
}

impl BoundArguments {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Bind `args` to `params`.
///
/// Positional arguments fill parameters in order and must precede named ones.
/// Positional arguments beyond the fixed parameters go to a trailing variadic
/// parameter; a named argument addressing the variadic parameter is passed
/// as-is. Parameters left over take their default or fail.
pub fn bind(params: &[Param], args: &[Argument], call_span: Span) -> Result<BoundArguments, BindingError> {
    let variadic = params
        .last()
        .filter(|p| p.is_variadic())
        .map(|_| params.len() - 1);
    let fixed = variadic.unwrap_or(params.len());

    let mut slots: Vec<Option<BoundSlot>> = vec![None; params.len()];
    let mut extra: Vec<usize> = Vec::new();
    let mut next_positional = 0;
    let mut seen_named = false;

    for (index, arg) in args.iter().enumerate() {
        match &arg.name {
            None => {
                if seen_named {
                    return Err(BindingError::PositionalAfterNamed { span: arg.span });
                }
                if next_positional < fixed {
                    slots[next_positional] = Some(BoundSlot::Arg(index));
                    next_positional += 1;
                } else if variadic.is_some() {
                    extra.push(index);
                } else {
                    return Err(BindingError::TooManyArguments {
                        expected: params.len(),
                        found: args.len(),
                        span: arg.span,
                    });
                }
            }
            Some(name) => {
                seen_named = true;
                let Some(position) = params.iter().position(|p| &p.name == name) else {
                    return Err(BindingError::UnknownParameter {
                        name: name.clone(),
                        span: arg.span,
                    });
                };
                let taken = slots[position].is_some() || (Some(position) == variadic && !extra.is_empty());
                if taken {
                    return Err(BindingError::DuplicateArgument {
                        name: name.clone(),
                        span: arg.span,
                    });
                }
                slots[position] = Some(BoundSlot::Arg(index));
            }
        }
    }

    if let Some(tail) = variadic {
        if slots[tail].is_none() {
            slots[tail] = Some(BoundSlot::Variadic(extra));
        }
    }

    params
        .iter()
        .zip(slots)
        .map(|(param, slot)| match (slot, &param.default) {
            (Some(slot), _) => Ok(slot),
            (None, Some(default)) => Ok(BoundSlot::Default(default.clone())),
            (None, None) => Err(BindingError::MissingArgument {
                name: param.name.clone(),
                span: call_span,
            }),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|slots| BoundArguments { slots })
}
