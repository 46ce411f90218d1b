use crate::error::{AppError, AppResult};
use crate::models::principal::{self, Role};
use crate::models::{class_group, school};
use sea_orm::{DatabaseConnection, EntityTrait};

/// Everyone who should hear about a student's report. Any adult slot may be
/// empty when the school data is incomplete; resolution still succeeds.
#[derive(Debug, Clone)]
pub struct EscalationTargets {
    pub student: principal::Model,
    pub school: school::Model,
    pub director: Option<principal::Model>,
    pub teacher: Option<principal::Model>,
    pub guardian: Option<principal::Model>,
}

impl EscalationTargets {
    /// Deduplicated notification addresses, directors first.
    pub fn recipients(&self) -> Vec<String> {
        let mut out = Vec::new();
        for adult in [&self.director, &self.teacher, &self.guardian]
            .into_iter()
            .flatten()
        {
            if !out.contains(&adult.email) {
                out.push(adult.email.clone());
            }
        }
        out
    }
}

#[derive(Clone)]
pub struct EscalationResolver {
    db: DatabaseConnection,
}

impl EscalationResolver {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Walks from a student to the adults responsible for them: the school
    /// director, the class teacher and the registered guardian.
    pub async fn resolve(&self, student_id: i32) -> AppResult<EscalationTargets> {
        let student = principal::Entity::find_by_id(student_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;
        if student.parsed_role() != Some(Role::Student) {
            return Err(AppError::NotFound);
        }

        let school_id = student
            .school_id
            .ok_or_else(|| AppError::Validation("student is not assigned to a school".into()))?;
        let school = school::Entity::find_by_id(school_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let director = match school.director_id {
            Some(id) => principal::Entity::find_by_id(id).one(&self.db).await?,
            None => None,
        };

        let teacher = match student.class_group_id {
            Some(group_id) => {
                let group = class_group::Entity::find_by_id(group_id).one(&self.db).await?;
                match group.and_then(|g| g.teacher_id) {
                    Some(id) => principal::Entity::find_by_id(id).one(&self.db).await?,
                    None => None,
                }
            }
            None => None,
        };

        let guardian = match student.guardian_id {
            Some(id) => principal::Entity::find_by_id(id).one(&self.db).await?,
            None => None,
        };

        if director.is_none() {
            tracing::warn!(student_id, school_id, "school has no director on record");
        }

        Ok(EscalationTargets {
            student,
            school,
            director,
            teacher,
            guardian,
        })
    }
}
