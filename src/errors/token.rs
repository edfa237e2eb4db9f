use thiserror::Error;

/// Why a bearer token was refused. Only logged; clients see one generic answer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("signature does not match")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token could not be parsed")]
    Malformed,
}
