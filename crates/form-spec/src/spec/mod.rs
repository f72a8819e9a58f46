pub mod derived;
pub mod field;
pub mod form;
pub mod validation;

pub use derived::DerivedConfig;
pub use field::{FieldType, FormField};
pub use form::FormSchema;
pub use validation::{PasswordRule, ValidationRules};
