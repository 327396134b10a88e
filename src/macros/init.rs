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


/// Configures the process-wide recorder.
///
/// An optional parameter may be passed to define the
/// [configuration](struct.Config.html).
///
/// The `LOGPANE_THREAD` and `LOGPANE_MIRROR` environment variables
/// override the passed configuration.
///
/// Returns `Result<(), ParseError>`.
///
/// # Example
///
/// ```rust
/// #[macro_use]
/// extern crate logpane;
/// use logpane as lp;
///
/// fn main() {
///     lp_init!().unwrap();
///
///     info!("Coucou!");
///     assert_eq!(lp::store().snapshot()[0].body(), "Coucou!");
/// }
/// ```
///
/// If the mirror thread is activated consider using [sync](fn.sync.html)
/// to ensure that all records are mirrored.
///
/// # Example
///
/// ```rust
/// #[macro_use]
/// extern crate logpane;
/// use logpane as lp;
///
/// use std::sync::{Arc, Mutex};
///
/// fn main() {
///     lp_init!(&lp::Config { thread: true, ..Default::default() }).unwrap();
///
///     let out = Arc::new(Mutex::new(String::new()));
///     {
///         let out = out.clone();
///         lp_register_handler!(Box::new(move |record, _| {
///             out.lock().unwrap().push_str(record.body());
///         }));
///     }
///     error!("foo");
///
///     lp::sync();
///
///     assert_eq!(*out.lock().unwrap(), "foo");
/// }
/// ```
#[macro_export]
macro_rules! lp_init {
    () => {{
        let config: $crate::Config = Default::default();
        $crate::lp_init!(&config)
    }};
    ($config:expr) => {{
        $crate::init($config)
    }};
}
