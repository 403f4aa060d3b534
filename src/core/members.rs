use crate::core::store::{RecordStore, Table};
use crate::core::{ConfigProvider, Enrollment, Member, MemberUpdate, Result, Storage, SubscriptionType};
use crate::utils::error::GymError;
use crate::utils::validation::validate_non_empty_string;

pub struct MemberRegistry<S: Storage, C: ConfigProvider> {
    store: RecordStore<S>,
    config: C,
}

impl<S: Storage, C: ConfigProvider> MemberRegistry<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            store: RecordStore::new(storage),
            config,
        }
    }

    pub fn create(&self, name: &str, subscription_type: &str) -> Result<Member> {
        validate_non_empty_string("name", name)?;
        let subscription_type: SubscriptionType = subscription_type.parse()?;

        let path = self.config.members_file();
        let mut members: Table<Member> = self.store.load_table(path);

        let member = Member {
            id: members.next_id(),
            name: name.trim().to_string(),
            subscription_type,
        };
        members.records.push(member.clone());
        self.store.save_table(path, &members)?;

        tracing::info!("Registered member {} ({})", member.id, member.subscription_type);
        Ok(member)
    }

    pub fn read_all(&self) -> Vec<Member> {
        self.store.load(self.config.members_file())
    }

    pub fn find_by_id(&self, id: &str) -> Option<Member> {
        self.read_all().into_iter().find(|m| m.id == id)
    }

    /// Applies the present fields of `update` to member `id`.
    ///
    /// A present name must not be blank, a present subscription type must be
    /// valid. Returns `Ok(None)` without writing anything when the id is unknown.
    pub fn update(&self, id: &str, update: MemberUpdate) -> Result<Option<Member>> {
        if let Some(name) = &update.name {
            validate_non_empty_string("name", name)?;
        }
        let subscription_type = update
            .subscription_type
            .as_deref()
            .map(str::parse::<SubscriptionType>)
            .transpose()?;

        let path = self.config.members_file();
        let mut members: Table<Member> = self.store.load_table(path);

        if members.is_unreadable(id) {
            return Err(GymError::StorageError {
                message: format!("row for member {} in {} cannot be read", id, path),
            });
        }
        let Some(member) = members.find_mut(id) else {
            tracing::debug!("Member {} not found, nothing to update", id);
            return Ok(None);
        };
        if update.is_empty() {
            return Ok(Some(member.clone()));
        }

        if let Some(name) = update.name {
            member.name = name.trim().to_string();
        }
        if let Some(subscription_type) = subscription_type {
            member.subscription_type = subscription_type;
        }
        let updated = member.clone();

        self.store.save_table(path, &members)?;
        tracing::info!("Updated member {}", id);
        Ok(Some(updated))
    }

    /// Removes member `id` and every enrollment that references it.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let path = self.config.members_file();
        let mut members: Table<Member> = self.store.load_table(path);

        if !members.remove(id) {
            return Ok(false);
        }
        self.store.save_table(path, &members)?;

        let enrollments_path = self.config.enrollments_file();
        let mut enrollments: Vec<Enrollment> = self.store.load(enrollments_path);
        let enrolled = enrollments.len();
        enrollments.retain(|e| e.member_id != id);
        self.store.save(enrollments_path, &enrollments)?;

        tracing::info!(
            "Deleted member {} and {} of their enrollments",
            id,
            enrolled - enrollments.len()
        );
        Ok(true)
    }
}
