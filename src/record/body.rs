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


use std::borrow::Cow;
use std::error::Error;
use std::fmt::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::sync::Arc;

const PREALLOC: usize = 128;

/// Separator placed between the values of a value list.
pub const SEPARATOR: &str = ", ";

/// Body used when rendering a value panics.
pub const UNRENDERABLE: &str = "<unrenderable>";

/// A value that can be put into a log record.
///
/// Rendering can't fail: whatever the implementation manages to write
/// into `out` becomes part of the record body.
///
/// Types outside of this crate that implement neither this trait nor
/// have a dedicated impl here can be wrapped into [`Dbg`](struct.Dbg.html)
/// or [`Disp`](struct.Disp.html).
pub trait Loggable {
    /// Appends the textual representation of the value to `out`.
    fn render(&self, out: &mut String);
}

macro_rules! loggable_display {
    ($($t:ty),*) => {
        $(
            impl Loggable for $t {
                #[inline]
                fn render(&self, out: &mut String) {
                    let _ = write!(out, "{}", self);
                }
            }
        )*
    };
}

loggable_display!(i8, i16, i32, i64, i128, isize,
                  u8, u16, u32, u64, u128, usize,
                  f32, f64, bool, char);

impl Loggable for str {
    #[inline]
    fn render(&self, out: &mut String) {
        out.push_str(self);
    }
}

impl Loggable for String {
    #[inline]
    fn render(&self, out: &mut String) {
        out.push_str(self);
    }
}

impl<'a> Loggable for Cow<'a, str> {
    #[inline]
    fn render(&self, out: &mut String) {
        out.push_str(self);
    }
}

impl<'a> Loggable for fmt::Arguments<'a> {
    fn render(&self, out: &mut String) {
        let _ = out.write_fmt(*self);
    }
}

impl Loggable for () {
    fn render(&self, out: &mut String) {
        out.push_str("()");
    }
}

impl<'a> Loggable for dyn Error + 'a {
    fn render(&self, out: &mut String) {
        let _ = write!(out, "{}", self);
    }
}

impl<'a> Loggable for dyn Error + Send + Sync + 'a {
    fn render(&self, out: &mut String) {
        let _ = write!(out, "{}", self);
    }
}

impl<'a, T: Loggable + ?Sized> Loggable for &'a T {
    #[inline]
    fn render(&self, out: &mut String) {
        (**self).render(out);
    }
}

impl<'a, T: Loggable + ?Sized> Loggable for &'a mut T {
    #[inline]
    fn render(&self, out: &mut String) {
        (**self).render(out);
    }
}

impl<T: Loggable + ?Sized> Loggable for Box<T> {
    #[inline]
    fn render(&self, out: &mut String) {
        (**self).render(out);
    }
}

impl<T: Loggable + ?Sized> Loggable for Rc<T> {
    #[inline]
    fn render(&self, out: &mut String) {
        (**self).render(out);
    }
}

impl<T: Loggable + ?Sized> Loggable for Arc<T> {
    #[inline]
    fn render(&self, out: &mut String) {
        (**self).render(out);
    }
}

impl<T: Loggable> Loggable for Option<T> {
    fn render(&self, out: &mut String) {
        match *self {
            Some(ref value) => value.render(out),
            None => out.push_str("None"),
        }
    }
}

fn render_seq<T: Loggable>(items: &[T], out: &mut String) {
    out.push('[');
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            out.push_str(SEPARATOR);
        }
        item.render(out);
    }
    out.push(']');
}

impl<T: Loggable> Loggable for [T] {
    fn render(&self, out: &mut String) {
        render_seq(self, out);
    }
}

impl<T: Loggable, const N: usize> Loggable for [T; N] {
    fn render(&self, out: &mut String) {
        render_seq(&self[..], out);
    }
}

impl<T: Loggable> Loggable for Vec<T> {
    fn render(&self, out: &mut String) {
        render_seq(&self[..], out);
    }
}

/// Renders any `Debug` value.
///
/// ```rust
/// use logpane::{Dbg, Loggable};
///
/// let mut out = String::new();
/// Dbg(Some("x")).render(&mut out);
/// assert_eq!(out, r#"Some("x")"#);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Dbg<T>(pub T);

impl<T: fmt::Debug> Loggable for Dbg<T> {
    fn render(&self, out: &mut String) {
        let _ = write!(out, "{:?}", self.0);
    }
}

/// Renders any `Display` value.
#[derive(Clone, Copy, Debug)]
pub struct Disp<T>(pub T);

impl<T: fmt::Display> Loggable for Disp<T> {
    fn render(&self, out: &mut String) {
        let _ = write!(out, "{}", self.0);
    }
}

/// Joins values with the [separator](constant.SEPARATOR.html).
pub fn join(values: &[&dyn Loggable]) -> String {
    let mut out = String::with_capacity(PREALLOC);
    for (idx, value) in values.iter().enumerate() {
        if idx > 0 {
            out.push_str(SEPARATOR);
        }
        value.render(&mut out);
    }
    out
}

/// What the caller passes as a message.
///
/// The body is rendered into a string right away, at the moment of the call.
pub enum Body<'a> {
    /// Pre-formatted text.
    Text(Cow<'a, str>),
    /// Output of `format_args!`.
    Args(fmt::Arguments<'a>),
    /// Values joined with the [separator](constant.SEPARATOR.html).
    Values(&'a [&'a dyn Loggable]),
}

impl<'a> Body<'a> {
    /// Renders the body.
    ///
    /// Never fails nor panics: a value whose rendering panics turns the
    /// whole body into [`UNRENDERABLE`](constant.UNRENDERABLE.html).
    pub fn render(self) -> String {
        match self {
            Body::Text(text) => text.into_owned(),
            Body::Args(args) => guarded(move || {
                let mut out = String::with_capacity(PREALLOC);
                args.render(&mut out);
                out
            }),
            Body::Values(values) => guarded(move || join(values)),
        }
    }
}

fn guarded<F: FnOnce() -> String>(render: F) -> String {
    panic::catch_unwind(AssertUnwindSafe(render))
        .unwrap_or_else(|_| UNRENDERABLE.to_string())
}

impl<'a> From<&'a str> for Body<'a> {
    fn from(text: &'a str) -> Self {
        Body::Text(Cow::Borrowed(text))
    }
}

impl<'a> From<&'a String> for Body<'a> {
    fn from(text: &'a String) -> Self {
        Body::Text(Cow::Borrowed(text.as_str()))
    }
}

impl<'a> From<String> for Body<'a> {
    fn from(text: String) -> Self {
        Body::Text(Cow::Owned(text))
    }
}

impl<'a> From<Cow<'a, str>> for Body<'a> {
    fn from(text: Cow<'a, str>) -> Self {
        Body::Text(text)
    }
}

impl<'a> From<fmt::Arguments<'a>> for Body<'a> {
    fn from(args: fmt::Arguments<'a>) -> Self {
        Body::Args(args)
    }
}

impl<'a> From<&'a [&'a dyn Loggable]> for Body<'a> {
    fn from(values: &'a [&'a dyn Loggable]) -> Self {
        Body::Values(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io;

    struct Broken;

    impl fmt::Display for Broken {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("half")?;
            Err(fmt::Error)
        }
    }

    struct Exploding;

    impl fmt::Display for Exploding {
        fn fmt(&self, _: &mut fmt::Formatter) -> fmt::Result {
            panic!("nope");
        }
    }

    #[derive(Debug)]
    struct Opaque {
        x: u8,
    }

    #[test]
    fn test_body_join() {
        let values: [&dyn Loggable; 3] = [&"a", &1, &true];
        assert_eq!(Body::Values(&values).render(), "a, 1, true");
    }

    #[test]
    fn test_body_mixed_values() {
        let name = String::from("bob");
        let nested = vec![1, 2];
        let none: Option<u8> = None;
        let values: [&dyn Loggable; 6] = [&"a", &1, &nested, &name, &none, &Dbg(Opaque { x: 3 })];
        assert_eq!(Body::Values(&values).render(), "a, 1, [1, 2], bob, None, Opaque { x: 3 }");
    }

    #[test]
    fn test_body_empty_values() {
        assert_eq!(Body::Values(&[]).render(), "");
    }

    #[test]
    fn test_body_text_and_args() {
        assert_eq!(Body::from("start").render(), "start");
        assert_eq!(Body::from(String::from("owned")).render(), "owned");
        assert_eq!(Body::from(format_args!("{}-{}", 1, 'x')).render(), "1-x");
    }

    #[test]
    fn test_body_failing_display() {
        let values: [&dyn Loggable; 2] = [&Disp(Broken), &"tail"];
        assert_eq!(Body::Values(&values).render(), "half, tail");
    }

    #[test]
    fn test_body_panicking_display() {
        let values: [&dyn Loggable; 2] = [&"head", &Disp(Exploding)];
        assert_eq!(Body::Values(&values).render(), UNRENDERABLE);
        assert_eq!(Body::from(format_args!("{}", Exploding)).render(), UNRENDERABLE);
    }

    #[test]
    fn test_body_error_values() {
        let err: Box<dyn Error + Send + Sync> = Box::new(io::Error::new(io::ErrorKind::Other, "disk gone"));
        let values: [&dyn Loggable; 2] = [&"write failed", &err];
        assert_eq!(Body::Values(&values).render(), "write failed, disk gone");
    }

    #[test]
    fn test_body_floats_and_chars() {
        let values: [&dyn Loggable; 3] = [&1.5f64, &'c', &()];
        assert_eq!(join(&values), "1.5, c, ()");
    }
}
