/// Creates a crate-level [`Error`](crate::Error) from a variant of any error
/// enum that converts into [`ErrorKind`](crate::ErrorKind). Every field value
/// goes through an [`Into`] conversion, and a field without a value is taken
/// from the variable with the same name.
macro_rules! err {
    (@val $variant_ident:ident $field_val:expr) => ($field_val);
    (@val $variant_ident:ident) => ($variant_ident);
    ($variant_path:path $({
        $( $field_ident:ident $(: $field_val:expr)? ),*
        $(,)?
    })?) => {{
        use $variant_path as Variant;

        $crate::error::Error::from(
            Variant $({$(
                $field_ident: ::std::convert::Into::into(
                    $crate::error::err!(@val $field_ident $($field_val)?)
                )
            ),*})?
        )
    }};
}

/// Closure for `map_err` that puts the error into the `source` field of the variant
macro_rules! err_ctx {
    ($variant_path:path $({ $($variant_fields:tt)* })?) => {
        |source| $crate::error::err!($variant_path { source, $($($variant_fields)*)? })
    };
}

/// [`ErrorKind::Fatal`](crate::ErrorKind::Fatal) with a formatted message and no source
#[cfg(test)]
macro_rules! fatal {
    ($($arg:tt)*) => {
        $crate::error::err!($crate::ErrorKind::Fatal {
            message: format!($($arg)*),
            source: None,
        })
    };
}

pub(crate) use err;
pub(crate) use err_ctx;
#[cfg(test)]
pub(crate) use fatal;
