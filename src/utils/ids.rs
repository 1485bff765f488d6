use uuid::Uuid;

/// Prefix of lesson ids that have not been persisted yet.
pub static TEMP_PREFIX: &str = "temp-";

static BLOCK_PREFIX: &str = "block-";

pub fn temp_lesson_id() -> String {
    format!("{TEMP_PREFIX}{}", Uuid::new_v4())
}

pub fn block_id() -> String {
    format!("{BLOCK_PREFIX}{}", Uuid::new_v4())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn generated_ids_never_collide() {
        let ids: std::collections::HashSet<String> = (0..1000).map(|_| temp_lesson_id()).collect();
        assert_eq!(ids.len(), 1000);
        assert!(ids.iter().all(|id| id.starts_with(TEMP_PREFIX)));
        assert!(block_id().starts_with("block-"));
    }
}
