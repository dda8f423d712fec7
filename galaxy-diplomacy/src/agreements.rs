//! Agreement expiry sweep (§4.H step 5: "Expire proposals/agreements whose
//! `expires_at ≤ now`").

use chrono::{DateTime, Utc};

use galaxy_common::GameError;
use galaxy_store::Store;

pub async fn expire_agreements(store: &dyn Store, now: DateTime<Utc>) -> Result<u64, GameError> {
    let mut tx = store.begin().await.map_err(GameError::from)?;
    let expired = tx.expired_agreements(now).await.map_err(GameError::from)?;
    let count = expired.len() as u64;
    for agreement in expired {
        tx.delete_agreement(agreement.id).await.map_err(GameError::from)?;
    }
    tx.commit().await.map_err(GameError::from)?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_common::{AgreementKind, EmpireId};
    use galaxy_store::memory::InMemoryStore;
    use galaxy_store::Agreement;

    #[tokio::test]
    async fn expires_agreements_past_their_expires_at() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let a = EmpireId::new();
        let b = EmpireId::new();

        let mut tx = store.begin().await.unwrap();
        tx.create_agreement(Agreement {
            id: galaxy_common::AgreementId(0),
            empire_a: a,
            empire_b: b,
            kind: AgreementKind::NonAggressionPact,
            effective_at: now - chrono::Duration::days(100),
            expires_at: now - chrono::Duration::days(1),
            terms: serde_json::Value::Null,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();
        tx.commit().await.unwrap();

        let expired = expire_agreements(&store, now).await.unwrap();
        assert_eq!(expired, 1);

        let remaining = {
            let mut tx = store.begin().await.unwrap();
            let remaining = tx.active_agreements_between(a, b, now).await.unwrap();
            tx.rollback().await.unwrap();
            remaining
        };
        assert!(remaining.is_empty());
    }
}
