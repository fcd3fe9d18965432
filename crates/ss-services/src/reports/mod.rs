//! Report services
//!
//! Listings are visibility scoped: employees see their own reports, managers
//! also the reports of projects they manage, admins everything.

mod create;
mod delete;
mod statistics;
mod update;

pub use statistics::{round_percentage, ProjectWorkShare};

use std::collections::BTreeMap;

use chrono::NaiveDate;
use ss_contracts::base::UserContext;
use ss_contracts::reports::{can_manage_report, can_view_report};
use ss_core::error::SsError;
use ss_core::period::MonthPeriod;
use ss_core::result::SsResult;
use ss_core::traits::Id;
use ss_core::types::WorkHours;
use ss_db::{ReportFilter, ReportScope};
use ss_models::report::work_hours_per_date;
use ss_models::{Project, Report, ReportEntry, TaskActivityType, DEFAULT_TASK_ACTIVITY};

use crate::base::Stores;

#[derive(Clone)]
pub struct ReportService {
    stores: Stores,
}

impl ReportService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn find(&self, id: Id) -> SsResult<Report> {
        self.stores
            .reports
            .find_by_id(id)
            .await?
            .ok_or_else(|| SsError::not_found("Report", id))
    }

    async fn project(&self, id: Id) -> SsResult<Project> {
        self.stores
            .projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| SsError::not_found("Project", id))
    }

    /// Named activity, or the default one when none is given
    async fn task_activity(&self, id: Option<Id>) -> SsResult<TaskActivityType> {
        match id {
            Some(id) => self
                .stores
                .task_activities
                .find_by_id(id)
                .await?
                .ok_or_else(|| SsError::not_found("TaskActivityType", id)),
            None => Ok(self
                .stores
                .task_activities
                .get_or_create(DEFAULT_TASK_ACTIVITY, true)
                .await?),
        }
    }

    pub async fn get<U: UserContext>(&self, actor: &U, id: Id) -> SsResult<Report> {
        let report = self.find(id).await?;
        let project = self.project(report.project_id).await?;
        if !can_view_report(actor, &report, &project) {
            return Err(SsError::forbidden("You can not view this report"));
        }
        Ok(report)
    }

    async fn list_period(&self, period: MonthPeriod, scope: ReportScope) -> SsResult<Vec<ReportEntry>> {
        let filter = ReportFilter::new(period.first_day(), period.last_day(), scope);
        Ok(self.stores.reports.list(&filter).await?)
    }

    /// Month listing scoped by the actor's role
    pub async fn list_for_month<U: UserContext>(
        &self,
        actor: &U,
        year: i32,
        month: u32,
    ) -> SsResult<Vec<ReportEntry>> {
        let period = MonthPeriod::new(year, month)?;
        let scope = if actor.is_admin() {
            ReportScope::All
        } else if actor.is_manager() {
            let project_ids = self
                .stores
                .projects
                .list_managed_by(actor.id())
                .await?
                .into_iter()
                .filter_map(|p| p.id)
                .collect();
            ReportScope::AuthorOrProjects {
                author_id: actor.id(),
                project_ids,
            }
        } else {
            ReportScope::Author(actor.id())
        };
        self.list_period(period, scope).await
    }

    /// One author's month; admins may look at anybody
    pub async fn list_for_author<U: UserContext>(
        &self,
        actor: &U,
        author_id: Id,
        year: i32,
        month: u32,
    ) -> SsResult<Vec<ReportEntry>> {
        if !actor.is_admin() && actor.id() != author_id {
            return Err(SsError::forbidden(
                "Only administrators can view reports of other users",
            ));
        }
        let period = MonthPeriod::new(year, month)?;
        self.list_period(period, ReportScope::Author(author_id)).await
    }

    /// Reports for a user's monthly export. Managers get the part of the
    /// month booked in projects they manage.
    pub async fn list_for_user_export<U: UserContext>(
        &self,
        actor: &U,
        user_id: Id,
        year: i32,
        month: u32,
    ) -> SsResult<Vec<ReportEntry>> {
        let period = MonthPeriod::new(year, month)?;
        if actor.is_admin() || actor.id() == user_id {
            return self.list_period(period, ReportScope::Author(user_id)).await;
        }
        if !actor.is_manager() {
            return Err(SsError::forbidden("You can only export your own reports"));
        }

        let managed: Vec<Id> = self
            .stores
            .projects
            .list_managed_by(actor.id())
            .await?
            .into_iter()
            .filter(|p| p.is_member(user_id))
            .filter_map(|p| p.id)
            .collect();
        if managed.is_empty() {
            return Err(SsError::forbidden("You do not manage any project of this user"));
        }

        let entries = self.list_period(period, ReportScope::Author(user_id)).await?;
        Ok(entries
            .into_iter()
            .filter(|e| managed.contains(&e.report.project_id))
            .collect())
    }

    pub async fn list_for_project<U: UserContext>(
        &self,
        actor: &U,
        project_id: Id,
        year: i32,
        month: u32,
    ) -> SsResult<Vec<ReportEntry>> {
        let project = self.project(project_id).await?;
        if !can_manage_report(actor, &project) {
            return Err(SsError::forbidden("You are not a manager of this project"));
        }
        let period = MonthPeriod::new(year, month)?;
        self.list_period(period, ReportScope::Project(project_id)).await
    }

    pub async fn list_for_project_author<U: UserContext>(
        &self,
        actor: &U,
        project_id: Id,
        author_id: Id,
        year: i32,
        month: u32,
    ) -> SsResult<Vec<ReportEntry>> {
        let project = self.project(project_id).await?;
        if !can_manage_report(actor, &project) {
            return Err(SsError::forbidden("You are not a manager of this project"));
        }
        let period = MonthPeriod::new(year, month)?;
        self.list_period(
            period,
            ReportScope::ProjectAuthor {
                project_id,
                author_id,
            },
        )
        .await
    }

    /// Hours booked by the author on one day
    pub async fn daily_hours<U: UserContext>(
        &self,
        actor: &U,
        author_id: Id,
        date: NaiveDate,
    ) -> SsResult<WorkHours> {
        if !actor.is_admin() && actor.id() != author_id {
            return Err(SsError::forbidden("You can only view your own hours"));
        }
        Ok(self.stores.reports.daily_hours(author_id, date, None).await?)
    }

    /// Summed hours per day of the actor's month
    pub async fn work_hours_per_date<U: UserContext>(
        &self,
        actor: &U,
        year: i32,
        month: u32,
    ) -> SsResult<BTreeMap<NaiveDate, WorkHours>> {
        let period = MonthPeriod::new(year, month)?;
        let entries = self.list_period(period, ReportScope::Author(actor.id())).await?;
        Ok(work_hours_per_date(entries.iter().map(|e| &e.report)))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::base::test_support::{project, stores, user};
    use ss_models::{CreateReportDto, User, UserType};

    pub fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    pub fn dto(project_id: Id, day: u32, hours: i64) -> CreateReportDto {
        CreateReportDto {
            date: date(day),
            description: "Some work".into(),
            project_id,
            task_activity_id: None,
            work_hours: WorkHours::from_hm(hours, 0),
        }
    }

    /// Two employees in project A managed by the manager, a third in B
    pub struct Fixture {
        pub service: ReportService,
        pub stores: Stores,
        pub admin: User,
        pub manager: User,
        pub first: User,
        pub second: User,
        pub outsider: User,
        pub managed: Project,
        pub other: Project,
    }

    pub async fn fixture() -> Fixture {
        let stores = stores();
        let admin = user(&stores, "admin@codepoets.it", UserType::Admin).await;
        let manager = user(&stores, "m@codepoets.it", UserType::Manager).await;
        let first = user(&stores, "first@codepoets.it", UserType::Employee).await;
        let second = user(&stores, "second@codepoets.it", UserType::Employee).await;
        let outsider = user(&stores, "outsider@codepoets.it", UserType::Employee).await;
        let m = manager.id.unwrap();
        let managed = project(
            &stores,
            "Alpha",
            vec![m],
            vec![m, first.id.unwrap(), second.id.unwrap()],
        )
        .await;
        let other = project(&stores, "Beta", vec![], vec![first.id.unwrap(), outsider.id.unwrap()]).await;
        Fixture {
            service: ReportService::new(stores.clone()),
            stores,
            admin,
            manager,
            first,
            second,
            outsider,
            managed,
            other,
        }
    }

    #[tokio::test]
    async fn test_month_listing_is_scoped_by_role() {
        let f = fixture().await;
        let (managed, other) = (f.managed.id.unwrap(), f.other.id.unwrap());
        f.service.create(&f.first, dto(managed, 1, 2)).await.unwrap();
        f.service.create(&f.first, dto(other, 1, 2)).await.unwrap();
        f.service.create(&f.second, dto(managed, 2, 3)).await.unwrap();
        f.service.create(&f.outsider, dto(other, 2, 3)).await.unwrap();
        f.service.create(&f.manager, dto(managed, 3, 1)).await.unwrap();

        let count = |entries: Vec<ReportEntry>| entries.len();
        assert_eq!(count(f.service.list_for_month(&f.admin, 2024, 3).await.unwrap()), 5);
        assert_eq!(count(f.service.list_for_month(&f.manager, 2024, 3).await.unwrap()), 3);
        assert_eq!(count(f.service.list_for_month(&f.first, 2024, 3).await.unwrap()), 2);
        assert_eq!(count(f.service.list_for_month(&f.first, 2024, 4).await.unwrap()), 0);
        assert!(matches!(
            f.service.list_for_month(&f.first, 2024, 13).await,
            Err(SsError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_project_listings_need_management() {
        let f = fixture().await;
        let managed = f.managed.id.unwrap();
        f.service.create(&f.first, dto(managed, 1, 2)).await.unwrap();
        f.service.create(&f.second, dto(managed, 1, 2)).await.unwrap();

        let all = f.service.list_for_project(&f.manager, managed, 2024, 3).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].project_name, "Alpha");

        let one = f
            .service
            .list_for_project_author(&f.admin, managed, f.second.id.unwrap(), 2024, 3)
            .await
            .unwrap();
        assert_eq!(one.len(), 1);

        assert!(matches!(
            f.service.list_for_project(&f.first, managed, 2024, 3).await,
            Err(SsError::Forbidden { .. })
        ));
        assert!(matches!(
            f.service.list_for_author(&f.manager, f.first.id.unwrap(), 2024, 3).await,
            Err(SsError::Forbidden { .. })
        ));
    }

    #[tokio::test]
    async fn test_user_export_listing() {
        let f = fixture().await;
        let (managed, other) = (f.managed.id.unwrap(), f.other.id.unwrap());
        let first_id = f.first.id.unwrap();
        f.service.create(&f.first, dto(managed, 1, 2)).await.unwrap();
        f.service.create(&f.first, dto(other, 2, 3)).await.unwrap();

        let own = f.service.list_for_user_export(&f.first, first_id, 2024, 3).await.unwrap();
        assert_eq!(own.len(), 2);

        let managed_only = f
            .service
            .list_for_user_export(&f.manager, first_id, 2024, 3)
            .await
            .unwrap();
        assert_eq!(managed_only.len(), 1);
        assert_eq!(managed_only[0].project_name, "Alpha");

        assert!(matches!(
            f.service
                .list_for_user_export(&f.manager, f.outsider.id.unwrap(), 2024, 3)
                .await,
            Err(SsError::Forbidden { .. })
        ));
        assert!(matches!(
            f.service.list_for_user_export(&f.second, first_id, 2024, 3).await,
            Err(SsError::Forbidden { .. })
        ));
    }

    #[tokio::test]
    async fn test_hours_per_date() {
        let f = fixture().await;
        let (managed, other) = (f.managed.id.unwrap(), f.other.id.unwrap());
        f.service.create(&f.first, dto(managed, 1, 2)).await.unwrap();
        f.service.create(&f.first, dto(other, 1, 3)).await.unwrap();
        f.service.create(&f.first, dto(other, 4, 8)).await.unwrap();

        let totals = f.service.work_hours_per_date(&f.first, 2024, 3).await.unwrap();
        assert_eq!(totals[&date(1)], WorkHours::from_hm(5, 0));
        assert_eq!(totals[&date(4)], WorkHours::from_hm(8, 0));

        let first_id = f.first.id.unwrap();
        assert_eq!(
            f.service.daily_hours(&f.first, first_id, date(1)).await.unwrap(),
            WorkHours::from_hm(5, 0)
        );
        assert!(f.service.daily_hours(&f.second, first_id, date(1)).await.is_err());
    }
}
