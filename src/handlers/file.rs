// Copyright 2017 Dmytro Milinevskyi <dmilinevskyi@gmail.com>

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at

// http://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use parking_lot::Mutex;

use std::fs::{File, OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::Path;

use crate::handlers::Handler;

struct Context {
    file: File,
}

impl Context {
    fn new(path: &Path) -> io::Result<Self> {
        if let Some(dir) = path.parent() {
            create_dir_all(dir)?;
        }
        Ok(Context {
            file: OpenOptions::new().append(true).create(true).open(path)?,
        })
    }

    fn emit(&mut self, msg: &[u8]) {
        let _ = self.file.write_all(msg);
    }
}

/// Appends formatted log records to a file.
///
/// The directories to the log file are created automatically.
/// Fails only if the file can't be opened, write errors are ignored.
pub fn handler(path: &Path) -> io::Result<Handler> {
    let ctx = Mutex::new(Context::new(path)?);
    Ok(Box::new(move |_, formatted| {
        ctx.lock().emit(formatted.as_bytes());
    }))
}
