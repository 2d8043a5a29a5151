// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParamsError {
    #[error("Argument file '{file}' doesn't have a recognised file extension! Valid extensions are: {valid}")]
    UnrecognisedExtension { file: String, valid: String },

    #[error("Couldn't decode parameters from {file}:\n{err}")]
    Decode { file: String, err: String },

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
