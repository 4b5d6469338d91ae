use std::path::PathBuf;

use thiserror::Error;

/// Failures at the image boundary. Clustering itself never fails.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
