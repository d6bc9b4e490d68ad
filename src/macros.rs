pub use enclose::*;

/// Builds a [`Function`](crate::Function) from a typed closure.
///
/// ```
/// use cellgraph::function;
///
/// let sum = function!(|a: i64, b: i64| a + b);
/// assert_eq!(sum.arity(), 2);
///
/// let factor = 10_i64;
/// let scale = function!((factor) |a: i64| a * factor);
/// assert_eq!(scale.arity(), 1);
/// ```
#[macro_export]
macro_rules! function {
    (( $($d_tt:tt)* ) |$($arg:ident : $ty:ty),+| $body:expr) => {
        $crate::macros::enclose!(($( $d_tt )*) $crate::function!(|$($arg: $ty),+| $body))
    };
    (|$($arg:ident : $ty:ty),+| $body:expr) => {
        $crate::Function::new(
            [$(<$ty as $crate::Scalar>::KIND),+],
            move |args: &[$crate::Value]| {
                let mut args = args.iter();
                $( let $arg: $ty = $crate::next_arg(&mut args); )+
                $body
            },
        )
    };
}
