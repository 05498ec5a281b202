/// Declares a `String` newtype with the derives shared by every name-like type in the crate.
///
/// Extra attributes (serde derives, docs) are forwarded after the common derive list.
#[macro_export]
macro_rules! string_newtype {
    ($(#[$meta:meta])* $vis:vis $name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            derive_more::Display,
            derive_more::Deref,
            derive_more::From,
            derive_more::Into,
            derive_more::AsRef,
        )]
        $(#[$meta])*
        $vis struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}
