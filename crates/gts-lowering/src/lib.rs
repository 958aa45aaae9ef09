//! Lowering passes over GTS syntax trees.
//!
//! - `define_lowering` - `define` blocks to runtime calls (build output)
//! - `erase` - TypeScript syntax removal, run after `define_lowering`
//! - `typings` - `define` blocks to a type-checkable virtual document
//!
//! Every pass takes the arena by `&mut`, appends the nodes it creates and
//! returns the new root; the input tree stays intact.

pub mod builders;
pub mod define_lowering;
pub mod erase;
pub mod shortcut;
pub mod state;
pub mod transform;
pub mod typings;

pub use builders::NodeFactory;
pub use define_lowering::lower;
pub use erase::erase_types;
pub use state::{ExternalizedBinding, TransformState};
pub use transform::Transform;
pub use typings::{
    DeferredDeclarations, DeferredPayload, LeafToken, TypingsOutput, lower_for_typings,
    print_typings,
};
