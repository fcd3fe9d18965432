//! Predefined data set sizes

use clap::ValueEnum;

/// Size of a predefined data set
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DataSize {
    Small,
    Medium,
    Large,
    #[value(name = "extra_large", alias = "extra-large")]
    ExtraLarge,
}

/// Target numbers of users and projects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataSet {
    pub superuser: bool,
    pub admins: i64,
    pub employees: i64,
    pub managers: i64,
    pub suspended_projects: i64,
    pub active_projects: i64,
    pub completed_projects: i64,
}

impl DataSize {
    pub fn data_set(self) -> DataSet {
        let (admins, employees, managers, suspended, active, completed) = match self {
            DataSize::Small => (2, 15, 3, 1, 5, 2),
            DataSize::Medium => (10, 70, 20, 7, 25, 10),
            DataSize::Large => (70, 300, 100, 50, 150, 70),
            DataSize::ExtraLarge => (250, 1000, 400, 150, 450, 250),
        };
        DataSet {
            superuser: true,
            admins,
            employees,
            managers,
            suspended_projects: suspended,
            active_projects: active,
            completed_projects: completed,
        }
    }
}

impl DataSet {
    pub fn is_empty(&self) -> bool {
        *self == DataSet::default()
    }
}
