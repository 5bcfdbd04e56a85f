use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown {kind} name: '{name}'")]
    UnknownName { kind: &'static str, name: String },
}
