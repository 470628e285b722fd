use pinfold_model::PinId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlbumError {
    #[error(transparent)]
    Model(#[from] pinfold_model::ModelError),

    #[error("there was an error with the request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("credentials were not accepted")]
    Auth,

    #[error("request returned a non-OK status code of {0}")]
    Http(u16),

    #[error("no data was returned by the request")]
    EmptyBody,

    #[error("could not parse the response: {0}")]
    Decode(String),

    #[error("invalid image URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("result record at position {position} has no image URL")]
    MissingImageUrl { position: usize },

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("pin not found: {0}")]
    PinNotFound(PinId),

    #[error("an acquisition is already in flight for pin {0}")]
    OperationInFlight(PinId),
}

pub type Result<T> = std::result::Result<T, AlbumError>;
