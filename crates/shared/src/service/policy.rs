use crate::{abstract_trait::EntryPolicyTrait, errors::ServiceError, model::Entry};
use async_trait::async_trait;

/// Default mutation policy: every authenticated staff member may change
/// any entry. The workshop runs a single shared queue, so ownership
/// checks live behind the trait for deployments that need them.
#[derive(Debug, Default, Clone)]
pub struct SharedStaffPolicy;

#[async_trait]
impl EntryPolicyTrait for SharedStaffPolicy {
    async fn authorize_mutation(
        &self,
        _actor_email: &str,
        _entry: &Entry,
    ) -> Result<(), ServiceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_entry() -> Entry {
        let now = Utc::now().naive_utc();
        Entry {
            entry_id: 1,
            public_id: "a2a61b41-9a5c-4c5d-8f1e-30a7f0a01f11".into(),
            customer_name: "Dana Cruz".into(),
            customer_phone: "09171234567".into(),
            customer_email: "dana@example.com".into(),
            delivery_address: "12 Mabini St".into(),
            item_description: "Leather boots".into(),
            shoe_condition: "worn sole".into(),
            shoe_service: None,
            waiver_signed: false,
            waiver_url: None,
            before_photos: "[]".into(),
            assigned_to: None,
            needs_reglue: None,
            needs_paint: None,
            status: "pending".into(),
            service_details: None,
            after_photos: "[]".into(),
            billing: None,
            additional_billing: None,
            delivery_option: None,
            marked_as: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn any_authenticated_staff_member_is_admitted() {
        let policy = SharedStaffPolicy;
        let entry = sample_entry();

        assert!(
            policy
                .authorize_mutation("staff@example.com", &entry)
                .await
                .is_ok()
        );
        assert!(
            policy
                .authorize_mutation("someone-else@example.com", &entry)
                .await
                .is_ok()
        );
    }
}
