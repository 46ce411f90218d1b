pub mod class_group;
pub mod incident;
pub mod principal;
pub mod report;
pub mod school;

pub use class_group::{Entity as ClassGroup, Model as ClassGroupModel};
pub use incident::{IncidentType, ReporterRole, Severity, StructuredIncident};
pub use principal::{Entity as Principal, Model as PrincipalModel, Role};
pub use report::{Entity as Report, Model as ReportModel, ReportStatus};
pub use school::{Entity as School, Model as SchoolModel};
