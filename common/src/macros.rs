/// Declares a uuid-backed identifier newtype.
#[macro_export]
macro_rules! id_type {
    ($name:ident) => {
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Ord,
            PartialOrd,
            Debug,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[repr(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            pub fn unique() -> $name {
                $name(::uuid::Uuid::new_v4())
            }
            pub fn nil() -> $name {
                $name(::uuid::Uuid::nil())
            }
            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }
            pub fn as_uuid(&self) -> ::uuid::Uuid {
                self.0
            }
        }

        impl ::std::convert::From<::uuid::Uuid> for $name {
            fn from(uuid: ::uuid::Uuid) -> $name {
                $name(uuid)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::anyhow::Error;

            fn from_str(id: &str) -> ::std::result::Result<$name, Self::Err> {
                let uuid = ::uuid::Uuid::parse_str(id)?;
                ::std::result::Result::Ok($name(uuid))
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::std::default::Default for $name {
            fn default() -> $name {
                $name::nil()
            }
        }
    };
}
