use uuid::Uuid;

/// Source of fresh task identifiers.
pub trait IdGenerator {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

impl<F: Fn() -> String> IdGenerator for F {
    fn next_id(&self) -> String {
        self()
    }
}
