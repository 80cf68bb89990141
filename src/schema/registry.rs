//! Declaration macro for registry enumerations

/// Declares a closed token enumeration.
///
/// Each variant is bound to its wire token; the macro derives serde
/// (de)serialization through the token and implements [`Token`](super::Token),
/// `Display` and `FromStr`.
macro_rules! token_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident : $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $token)] $variant ),+
        }

        impl $crate::schema::Token for $name {
            const KIND: &'static str = $kind;
            const ALL: &'static [Self] = &[$( Self::$variant ),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $token ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::schema::Token::as_str(self))
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::schema::UnknownToken;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as $crate::schema::Token>::from_token(s)
                    .ok_or_else(|| $crate::schema::UnknownToken::new::<Self>(s))
            }
        }
    };
}
