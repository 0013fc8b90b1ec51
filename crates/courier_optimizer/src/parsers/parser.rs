use std::{io, path::Path, path::PathBuf};

use thiserror::Error;

use crate::problem::load::Load;

/// Fatal input failures. Per-line parse problems are not errors: bad lines
/// (the header included) are skipped where they occur.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("read failure: {0}")]
    Scan(#[from] io::Error),
}

/// A file-format front end producing the load list a problem is built
/// from.
pub trait LoadsParser {
    fn parse<P: AsRef<Path>>(&self, file: P) -> Result<Vec<Load>, InputError>;
}
