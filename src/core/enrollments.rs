use crate::core::store::RecordStore;
use crate::core::{
    CapacityRow, Class, ConfigProvider, Enrollment, EnrollmentOutcome, Member, Result, Storage,
};
use std::collections::HashSet;

/// Member/class pairs, with the duplicate and capacity rules.
pub struct EnrollmentManager<S: Storage, C: ConfigProvider> {
    store: RecordStore<S>,
    config: C,
}

impl<S: Storage, C: ConfigProvider> EnrollmentManager<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            store: RecordStore::new(storage),
            config,
        }
    }

    pub fn read_all(&self) -> Vec<Enrollment> {
        self.store.load(self.config.enrollments_file())
    }

    /// Checks run in order: class exists, member exists, not already
    /// enrolled, class not full.
    pub fn enroll(&self, member_id: &str, class_id: &str) -> Result<EnrollmentOutcome> {
        let classes: Vec<Class> = self.store.load(self.config.classes_file());
        let Some(class) = classes.into_iter().find(|c| c.id == class_id) else {
            return Ok(EnrollmentOutcome::ClassNotFound {
                class_id: class_id.to_string(),
            });
        };

        let members: Vec<Member> = self.store.load(self.config.members_file());
        if !members.iter().any(|m| m.id == member_id) {
            return Ok(EnrollmentOutcome::MemberNotFound {
                member_id: member_id.to_string(),
            });
        }

        let path = self.config.enrollments_file();
        let mut enrollments: Vec<Enrollment> = self.store.load(path);

        let in_class: Vec<&Enrollment> = enrollments
            .iter()
            .filter(|e| e.class_id == class_id)
            .collect();
        if in_class.iter().any(|e| e.member_id == member_id) {
            return Ok(EnrollmentOutcome::AlreadyEnrolled {
                member_id: member_id.to_string(),
                class_name: class.name,
            });
        }
        if in_class.len() >= class.capacity as usize {
            tracing::debug!(
                "Class {} is full ({}/{})",
                class_id,
                in_class.len(),
                class.capacity
            );
            return Ok(EnrollmentOutcome::CapacityReached {
                class_name: class.name,
                capacity: class.capacity,
            });
        }

        enrollments.push(Enrollment::new(member_id, class_id));
        self.store.save(path, &enrollments)?;

        tracing::info!("Enrolled member {} in class {}", member_id, class_id);
        Ok(EnrollmentOutcome::Enrolled {
            member_id: member_id.to_string(),
            class_name: class.name,
        })
    }

    /// Removes the exact pair. Returns whether anything was removed.
    pub fn unenroll(&self, member_id: &str, class_id: &str) -> Result<bool> {
        let path = self.config.enrollments_file();
        let mut enrollments: Vec<Enrollment> = self.store.load(path);
        let before = enrollments.len();

        enrollments.retain(|e| !e.matches(member_id, class_id));
        if enrollments.len() == before {
            return Ok(false);
        }

        self.store.save(path, &enrollments)?;
        tracing::info!("Unenrolled member {} from class {}", member_id, class_id);
        Ok(true)
    }

    pub fn members_of_class(&self, class_id: &str) -> Vec<Member> {
        let member_ids: HashSet<String> = self
            .read_all()
            .into_iter()
            .filter(|e| e.class_id == class_id)
            .map(|e| e.member_id)
            .collect();

        self.store
            .load::<Member>(self.config.members_file())
            .into_iter()
            .filter(|m| member_ids.contains(&m.id))
            .collect()
    }

    pub fn classes_of_member(&self, member_id: &str) -> Vec<Class> {
        let class_ids: HashSet<String> = self
            .read_all()
            .into_iter()
            .filter(|e| e.member_id == member_id)
            .map(|e| e.class_id)
            .collect();

        self.store
            .load::<Class>(self.config.classes_file())
            .into_iter()
            .filter(|c| class_ids.contains(&c.id))
            .collect()
    }

    /// Remaining seats per class, in class-file order.
    pub fn capacity_report(&self) -> Vec<CapacityRow> {
        let enrollments = self.read_all();

        self.store
            .load::<Class>(self.config.classes_file())
            .into_iter()
            .map(|class| {
                let enrolled = enrollments.iter().filter(|e| e.class_id == class.id).count();
                let available = u32::try_from(enrolled)
                    .ok()
                    .and_then(|enrolled| class.capacity.checked_sub(enrolled))
                    .unwrap_or_else(|| {
                        tracing::warn!(
                            "Class {} has {} enrollments for capacity {}",
                            class.id,
                            enrolled,
                            class.capacity
                        );
                        0
                    });
                CapacityRow {
                    class,
                    enrolled,
                    available,
                }
            })
            .collect()
    }
}
