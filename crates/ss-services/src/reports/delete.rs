use ss_contracts::base::UserContext;
use ss_contracts::reports::DeleteReportContract;
use ss_core::result::SsResult;
use ss_core::traits::Id;

use super::ReportService;
use crate::base::check;

impl ReportService {
    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub async fn delete<U: UserContext>(&self, actor: &U, id: Id) -> SsResult<()> {
        let report = self.find(id).await?;
        let project = self.project(report.project_id).await?;
        check(&DeleteReportContract::new(actor, &project), &report)?;

        self.stores.reports.delete(id).await?;
        tracing::debug!("Report {} deleted by {}", id, actor.id());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{dto, fixture};
    use ss_core::error::SsError;

    #[tokio::test]
    async fn test_delete_permissions() {
        let f = fixture().await;
        let report = f
            .service
            .create(&f.first, dto(f.other.id.unwrap(), 1, 2))
            .await
            .unwrap();
        let id = report.id.unwrap();

        assert!(matches!(
            f.service.delete(&f.manager, id).await,
            Err(SsError::Forbidden { .. })
        ));
        assert!(matches!(
            f.service.delete(&f.outsider, id).await,
            Err(SsError::Forbidden { .. })
        ));

        f.service.delete(&f.first, id).await.unwrap();
        assert!(matches!(
            f.service.find(id).await,
            Err(SsError::NotFound { .. })
        ));
    }
}
