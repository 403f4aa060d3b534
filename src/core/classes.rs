use crate::core::store::{RecordStore, Table};
use crate::core::{Class, ClassUpdate, ConfigProvider, Enrollment, Result, Storage};
use crate::utils::error::GymError;
use crate::utils::validation::{validate_capacity, validate_non_empty_string};

pub struct ClassRegistry<S: Storage, C: ConfigProvider> {
    store: RecordStore<S>,
    config: C,
}

impl<S: Storage, C: ConfigProvider> ClassRegistry<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            store: RecordStore::new(storage),
            config,
        }
    }

    pub fn create(&self, name: &str, instructor: &str, capacity: i64) -> Result<Class> {
        validate_non_empty_string("name", name)?;
        validate_non_empty_string("instructor", instructor)?;
        let capacity = validate_capacity("capacity", capacity)?;

        let path = self.config.classes_file();
        let mut classes: Table<Class> = self.store.load_table(path);

        let class = Class {
            id: classes.next_id(),
            name: name.trim().to_string(),
            instructor: instructor.trim().to_string(),
            capacity,
        };
        classes.records.push(class.clone());
        self.store.save_table(path, &classes)?;

        tracing::info!(
            "Registered class {} '{}' with capacity {}",
            class.id,
            class.name,
            class.capacity
        );
        Ok(class)
    }

    pub fn read_all(&self) -> Vec<Class> {
        self.store.load(self.config.classes_file())
    }

    pub fn find_by_id(&self, id: &str) -> Option<Class> {
        self.read_all().into_iter().find(|c| c.id == id)
    }

    /// Applies the present fields of `update` to class `id`.
    ///
    /// Capacity may not drop below the number of members already enrolled.
    pub fn update(&self, id: &str, update: ClassUpdate) -> Result<Option<Class>> {
        if let Some(name) = &update.name {
            validate_non_empty_string("name", name)?;
        }
        if let Some(instructor) = &update.instructor {
            validate_non_empty_string("instructor", instructor)?;
        }
        let capacity = update
            .capacity
            .map(|capacity| validate_capacity("capacity", capacity))
            .transpose()?;

        let path = self.config.classes_file();
        let mut classes: Table<Class> = self.store.load_table(path);

        if classes.is_unreadable(id) {
            return Err(GymError::StorageError {
                message: format!("row for class {} in {} cannot be read", id, path),
            });
        }
        let Some(class) = classes.find_mut(id) else {
            tracing::debug!("Class {} not found, nothing to update", id);
            return Ok(None);
        };
        if update.is_empty() {
            return Ok(Some(class.clone()));
        }

        if let Some(capacity) = capacity {
            let enrolled = self
                .store
                .load::<Enrollment>(self.config.enrollments_file())
                .iter()
                .filter(|e| e.class_id == id)
                .count();
            if (capacity as usize) < enrolled {
                return Err(GymError::validation(
                    "capacity",
                    capacity,
                    format!("Class already has {} members enrolled", enrolled),
                ));
            }
            class.capacity = capacity;
        }
        if let Some(name) = update.name {
            class.name = name.trim().to_string();
        }
        if let Some(instructor) = update.instructor {
            class.instructor = instructor.trim().to_string();
        }
        let updated = class.clone();

        self.store.save_table(path, &classes)?;
        tracing::info!("Updated class {}", id);
        Ok(Some(updated))
    }

    /// Removes class `id` and every enrollment that references it.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let path = self.config.classes_file();
        let mut classes: Table<Class> = self.store.load_table(path);

        if !classes.remove(id) {
            return Ok(false);
        }
        self.store.save_table(path, &classes)?;

        let enrollments_path = self.config.enrollments_file();
        let mut enrollments: Vec<Enrollment> = self.store.load(enrollments_path);
        let enrolled = enrollments.len();
        enrollments.retain(|e| e.class_id != id);
        self.store.save(enrollments_path, &enrollments)?;

        tracing::info!(
            "Deleted class {} and {} of its enrollments",
            id,
            enrolled - enrollments.len()
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStorage;
    use crate::core::testing::{seed_classes, MockConfig};

    fn registry(storage: &MemoryStorage) -> ClassRegistry<MemoryStorage, MockConfig> {
        ClassRegistry::new(storage.clone(), MockConfig::new())
    }

    fn save_enrollments(storage: &MemoryStorage, pairs: &[(&str, &str)]) {
        let enrollments: Vec<Enrollment> = pairs
            .iter()
            .map(|(member, class)| Enrollment::new(*member, *class))
            .collect();
        RecordStore::new(storage.clone())
            .save("enrollments.json", &enrollments)
            .unwrap();
    }

    #[test]
    fn test_create_and_read_class() {
        let storage = MemoryStorage::new();
        let classes = registry(&storage);

        let yoga = classes.create("Yoga", "Ana", 2).unwrap();

        assert_eq!(yoga.id, "1");
        assert_eq!(yoga.capacity, 2);
        assert_eq!(classes.read_all(), vec![yoga.clone()]);
        assert_eq!(classes.find_by_id("1"), Some(yoga));
        assert!(classes.find_by_id("2").is_none());
    }

    #[test]
    fn test_create_rejects_invalid_input() {
        let storage = MemoryStorage::new();
        let classes = registry(&storage);

        assert!(classes.create("", "Ana", 5).unwrap_err().is_validation());
        assert!(classes.create("Yoga", " ", 5).unwrap_err().is_validation());
        assert!(classes.create("Yoga", "Ana", 0).unwrap_err().is_validation());
        assert!(classes.create("Yoga", "Ana", -2).unwrap_err().is_validation());
        assert!(classes.read_all().is_empty());
    }

    #[test]
    fn test_update_changes_present_fields_only() {
        let storage = MemoryStorage::new();
        let classes = registry(&storage);
        classes.create("Yoga", "Ana", 5).unwrap();

        let updated = classes
            .update(
                "1",
                ClassUpdate {
                    instructor: Some("Leo".to_string()),
                    capacity: Some(8),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "Yoga");
        assert_eq!(updated.instructor, "Leo");
        assert_eq!(updated.capacity, 8);
        assert_eq!(classes.find_by_id("1").unwrap(), updated);
    }

    #[test]
    fn test_update_cannot_shrink_below_enrollment() {
        let storage = MemoryStorage::new();
        seed_classes(&storage, &[("1", 3)]);
        save_enrollments(&storage, &[("1", "1"), ("2", "1")]);
        let classes = registry(&storage);

        let shrink = |capacity| ClassUpdate {
            capacity: Some(capacity),
            ..Default::default()
        };

        assert!(classes.update("1", shrink(1)).unwrap_err().is_validation());
        assert_eq!(classes.update("1", shrink(2)).unwrap().unwrap().capacity, 2);
    }

    #[test]
    fn test_update_unknown_class() {
        let storage = MemoryStorage::new();
        let classes = registry(&storage);

        let update = ClassUpdate {
            name: Some("Spin".to_string()),
            ..Default::default()
        };
        assert!(classes.update("3", update).unwrap().is_none());
    }

    #[test]
    fn test_delete_cascades_to_enrollments() {
        let storage = MemoryStorage::new();
        seed_classes(&storage, &[("A", 5), ("B", 5)]);
        save_enrollments(&storage, &[("1", "A"), ("2", "B"), ("3", "A")]);
        let classes = registry(&storage);

        assert!(classes.delete("A").unwrap());
        assert!(!classes.delete("A").unwrap());

        let remaining: Vec<Enrollment> =
            RecordStore::new(storage.clone()).load("enrollments.json");
        assert_eq!(remaining, vec![Enrollment::new("2", "B")]);
        assert_eq!(classes.read_all().len(), 1);
    }

    fn spin_after_unreadable_box(storage: &MemoryStorage) -> Class {
        storage.put_file(
            "classes.csv",
            "class_id,name,instructor,capacity\n1,Yoga,Ana,10\n2,Box,Leo, 5\n",
        );
        save_enrollments(storage, &[("1", "2")]);
        registry(storage).create("Spin", "Eva", 3).unwrap()
    }

    #[test]
    fn test_create_does_not_reuse_id_of_unreadable_row() {
        let storage = MemoryStorage::new();

        let spin = spin_after_unreadable_box(&storage);

        assert_eq!(spin.id, "3");
        let text = storage.get_text("classes.csv").unwrap();
        assert!(text.contains("2,Box,Leo, 5\n"));
        let ids: Vec<String> = registry(&storage)
            .read_all()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_unreadable_row_survives_later_updates() {
        let storage = MemoryStorage::new();
        spin_after_unreadable_box(&storage);
        let classes = registry(&storage);

        let update = ClassUpdate {
            instructor: Some("Maya".to_string()),
            ..Default::default()
        };
        classes.update("1", update).unwrap().unwrap();

        let text = storage.get_text("classes.csv").unwrap();
        assert!(text.contains("1,Yoga,Maya,10\n"));
        assert!(text.contains("2,Box,Leo, 5\n"));
    }

    #[test]
    fn test_update_of_unreadable_row_fails() {
        let storage = MemoryStorage::new();
        spin_after_unreadable_box(&storage);
        let before = storage.get_file("classes.csv").unwrap();

        let update = ClassUpdate {
            capacity: Some(6),
            ..Default::default()
        };
        let err = registry(&storage).update("2", update).unwrap_err();

        assert!(matches!(err, GymError::StorageError { .. }));
        assert_eq!(storage.get_file("classes.csv").unwrap(), before);
    }

    #[test]
    fn test_delete_unreadable_row_drops_its_enrollments() {
        let storage = MemoryStorage::new();
        spin_after_unreadable_box(&storage);
        let classes = registry(&storage);

        assert!(classes.delete("2").unwrap());

        assert!(!storage.get_text("classes.csv").unwrap().contains("Box"));
        let remaining: Vec<Enrollment> =
            RecordStore::new(storage.clone()).load("enrollments.json");
        assert!(remaining.is_empty());
    }

    #[test]
    fn test_empty_update_does_not_rewrite_file() {
        let storage = MemoryStorage::new();
        seed_classes(&storage, &[("1", 4)]);
        let before = storage.get_file("classes.csv").unwrap();
        let classes = registry(&storage);

        let found = classes.update("1", ClassUpdate::default()).unwrap().unwrap();

        assert_eq!(found.capacity, 4);
        assert_eq!(storage.get_file("classes.csv").unwrap(), before);
    }
}
