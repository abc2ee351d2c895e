//! The `validate!` decoration macro

/// Decorate a function with argument and return validation
///
/// Two modes, told apart by the first token:
///
/// - bare: a callable expression followed by its signature validates every
///   annotated parameter and the return value, and yields the wrapped function
/// - parameterized: one or more string literals naming what to validate
///   (`"return"` names the return value), optionally followed by `;` and
///   `exclude = bool` / `settings = Settings` options. Yields a
///   [`Validate`](crate::decorator::Validate) to apply with `wrap` or
///   `wrap_async`.
///
/// Prefix the callable with `async` to wrap a function returning a future.
/// `validate!()` with no arguments is the same as [`Validate::all`](crate::decorator::Validate::all).
///
/// # Example
/// ```rust,ignore
/// let f = validate!(add, signature.clone());
/// let g = validate!(async fetch, signature.clone());
/// let h = validate!("i", "return"; exclude = true).wrap(signature, add);
/// ```
#[macro_export]
macro_rules! validate {
    () => {
        $crate::decorator::Validate::all()
    };

    (@options $decoration:expr;) => {
        $decoration
    };
    (@options $decoration:expr; exclude = $exclude:expr $(, $($rest:tt)*)?) => {
        $crate::validate!(@options $decoration.exclude($exclude); $($($rest)*)?)
    };
    (@options $decoration:expr; settings = $settings:expr $(, $($rest:tt)*)?) => {
        $crate::validate!(@options $decoration.settings($settings); $($($rest)*)?)
    };

    ($($name:literal),+ $(,)? $(; $($option:tt)*)?) => {
        $crate::validate!(
            @options $crate::decorator::Validate::only([$($name),+]);
            $($($option)*)?
        )
    };

    (async $func:expr, $signature:expr $(,)?) => {
        $crate::decorator::Validate::all().wrap_async($signature, $func)
    };

    ($func:expr, $signature:expr $(,)?) => {
        $crate::decorator::Validate::all().wrap($signature, $func)
    };
}
