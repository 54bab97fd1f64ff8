//! Input tree for the augmentation engine.
//!
//! The engine does not parse source text. A front end hands it one
//! [`SourceFile`] per compiled file:
//!
//! ```
//! use augment_ast::*;
//!
//! let file = SourceFile::new(0, "shapes.src").item(
//!     NamespaceDecl::new("Shapes")
//!         .item(TypeDecl::class("Circle"))
//!         .item(
//!             AugmentationDecl::extending("CircleExt", "Circle")
//!                 .member(MemberSyntax::property("Area", "double").get_only()),
//!         ),
//! );
//! assert_eq!(file.items.len(), 1);
//! ```

mod decl;
mod node;
mod types;

pub use decl::*;
pub use node::Ident;
pub use types::TypeExpr;
