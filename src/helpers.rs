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


/// Builds a [Source](source/struct.Source.html) for the call site.
///
/// Without arguments the subsystem is the crate name and the category
/// is the module path.
/// With one argument the category is the module path.
///
/// # Example
///
/// ```rust
/// #[macro_use]
/// extern crate logpane;
///
/// fn main() {
///     let source = source!();
///     assert_eq!(source.subsystem(), env!("CARGO_PKG_NAME"));
///     assert_eq!(source.category(), module_path!());
///
///     let source = source!("net");
///     assert_eq!(source.subsystem(), "net");
///
///     let source = source!("net", "tcp");
///     assert_eq!(source.to_string(), "net:tcp");
/// }
/// ```
#[macro_export]
macro_rules! source {
    () => {
        $crate::Source::new(env!("CARGO_PKG_NAME"), module_path!())
    };
    ($subsystem:expr) => {
        $crate::Source::new($subsystem, module_path!())
    };
    ($subsystem:expr, $category:expr) => {
        $crate::Source::new($subsystem, $category)
    };
}
