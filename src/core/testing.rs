use crate::adapters::MemoryStorage;
use crate::core::store::RecordStore;
use crate::core::{Class, ConfigProvider, Member, SubscriptionType};

pub struct MockConfig {
    data_dir: String,
    members_file: String,
    classes_file: String,
    enrollments_file: String,
}

impl MockConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            data_dir: "test_data".to_string(),
            members_file: "members.csv".to_string(),
            classes_file: "classes.csv".to_string(),
            enrollments_file: "enrollments.json".to_string(),
        }
    }
}

impl ConfigProvider for MockConfig {
    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn members_file(&self) -> &str {
        &self.members_file
    }

    fn classes_file(&self) -> &str {
        &self.classes_file
    }

    fn enrollments_file(&self) -> &str {
        &self.enrollments_file
    }
}

pub fn seed_members(storage: &MemoryStorage, ids: &[&str]) {
    let members: Vec<Member> = ids
        .iter()
        .map(|id| Member {
            id: id.to_string(),
            name: format!("Member {}", id),
            subscription_type: SubscriptionType::Monthly,
        })
        .collect();
    RecordStore::new(storage.clone())
        .save("members.csv", &members)
        .unwrap();
}

/// Seeds classes as `(id, capacity)` pairs.
pub fn seed_classes(storage: &MemoryStorage, classes: &[(&str, u32)]) {
    let classes: Vec<Class> = classes
        .iter()
        .map(|(id, capacity)| Class {
            id: id.to_string(),
            name: format!("Class {}", id),
            instructor: "Coach".to_string(),
            capacity: *capacity,
        })
        .collect();
    RecordStore::new(storage.clone())
        .save("classes.csv", &classes)
        .unwrap();
}
