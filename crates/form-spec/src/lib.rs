#![allow(missing_docs)]

pub mod builder;
pub mod computed;
pub mod expr;
pub mod graph;
pub mod session;
pub mod spec;
pub mod validate;
pub mod value;

pub use builder::{BuilderError, WorkingForm};
pub use computed::{derived_changes, recompute, recompute_on};
pub use expr::{ExpressionName, evaluate, evaluate_on};
pub use graph::{CycleError, DependencyGraph};
pub use session::{FormSession, SessionError};
pub use spec::{
    DerivedConfig, FieldType, FormField, FormSchema, PasswordRule, ValidationRules,
};
pub use validate::{ValidationError, ValidationResult, validate_field, validate_form};
pub use value::{ErrorMap, FieldValue, ValueMap};
