use serde::{Deserialize, Serialize};

// spotify ids are base62 strings, e.g. "0LcJLqbBmaGUft1e9Mm8HV"
macro_rules! id {
    ($($id:ident),*$(,)?) => {
        $(
            #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
            #[serde(transparent)]
            #[repr(transparent)]
            pub struct $id(String);

            impl $id {
                pub fn as_str(&self) -> &str {
                    &self.0
                }
            }

            impl From<String> for $id {
                fn from(value: String) -> Self {
                    Self(value)
                }
            }

            impl From<&str> for $id {
                fn from(value: &str) -> Self {
                    Self(value.to_owned())
                }
            }

            impl From<$id> for String {
                fn from(value: $id) -> Self {
                    value.0
                }
            }

            impl ::std::fmt::Display for $id {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    self.0.fmt(f)
                }
            }
        )*
    };
}

id![AlbumId, ArtistId];
