//! Helper macro for UUID-backed identifier newtypes.
//!
//! Aggregate ids are generated by the saga coordinator, never by a store, so
//! every identifier exposes `random()` alongside plain UUID wrapping.

macro_rules! define_uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(value: uuid::Uuid) -> Self {
                Self(value)
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<$name> for uuid::Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(value: uuid::Uuid) -> Self {
                Self(value)
            }
        }
    };
}

pub(crate) use define_uuid_id;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    define_uuid_id! {
        /// Identifier used only by this test module.
        ExampleId
    }

    #[rstest]
    fn random_ids_are_distinct() {
        assert_ne!(ExampleId::random(), ExampleId::random());
    }

    #[rstest]
    fn serialises_transparently_as_uuid() {
        let id = ExampleId::random();
        let encoded = serde_json::to_string(&id).expect("id serialises");
        assert_eq!(encoded, format!("\"{id}\""));

        let decoded: ExampleId = serde_json::from_str(&encoded).expect("id deserialises");
        assert_eq!(decoded, id);
    }
}
