use thiserror::Error;

/// Host-facing errors from instance construction and value setters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InstanceError {
    #[error("object class `{object}` is not a subtype of linked class `{linked}`")]
    ClassMismatch {
        object: &'static str,
        linked: &'static str,
    },
    #[error("script is linked to `{0}` but no object was bound")]
    ObjectRequired(&'static str),
    #[error("variable `{0}` is native-bound and cannot be set on the instance")]
    NativeVariable(String),
    #[error("variable `{name}` holds {expected:?}, not {got:?}")]
    KindMismatch {
        name: String,
        expected: values::ValueKind,
        got: values::ValueKind,
    },
}
