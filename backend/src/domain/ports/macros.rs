//! Helper macro generating port error enums with snake_case constructors.
//!
//! Each variant gets a constructor named after it; struct fields are taken
//! as `impl Into<T>` so callers can pass `&str` for `String` fields.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum StoreError {
            Unavailable => "store unavailable",
            Rejected { reason: String } => "store rejected write: {reason}",
            Slow { reason: String, millis: u64 } => "store slow ({millis} ms): {reason}",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(StoreError::unavailable().to_string(), "store unavailable");
    }

    #[test]
    fn string_fields_accept_str() {
        let err = StoreError::rejected("read only");
        assert_eq!(err, StoreError::Rejected { reason: "read only".to_owned() });
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = StoreError::slow("lock wait", 250_u64);
        assert_eq!(err.to_string(), "store slow (250 ms): lock wait");
    }
}
