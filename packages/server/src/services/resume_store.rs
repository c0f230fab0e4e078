//! Relational persistence of normalized resumes.
//!
//! A resume row owns its child rows and at most one `resume_file` row.
//! Functions take any connection so callers can run them inside a transaction.

use chrono::{DateTime, Utc};
use common::{
    EducationRecord, EndDate, Language, ParsedResume, ProfileFields, Project, Skill,
    WorkExperience,
};
use sea_orm::*;
use uuid::Uuid;

use crate::config::ChildRecordPolicy;
use crate::entity::{education, language, project, resume, resume_file, skill, work_experience};
use crate::models::resume::{STATUS_CREATED, STATUS_PARSED, STATUS_UPLOADED};

/// Metadata recorded for an uploaded document.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub content_hash: String,
    pub filename: String,
    pub content_type: Option<String>,
    pub size: i64,
}

/// A resume row with its children, read back as a normalized record.
#[derive(Debug, Clone)]
pub struct LoadedResume {
    pub row: resume::Model,
    pub parsed: ParsedResume,
    pub file: Option<resume_file::Model>,
}

/// Copy every non-empty extracted field over `base`.
pub fn merge_profile(base: &mut ProfileFields, extracted: &ProfileFields) {
    let pairs = [
        (&mut base.first_name, &extracted.first_name),
        (&mut base.last_name, &extracted.last_name),
        (&mut base.email, &extracted.email),
        (&mut base.phone, &extracted.phone),
        (&mut base.linkedin, &extracted.linkedin),
        (&mut base.github, &extracted.github),
        (&mut base.portfolio, &extracted.portfolio),
        (&mut base.address, &extracted.address),
        (&mut base.headline, &extracted.headline),
        (&mut base.summary, &extracted.summary),
        (&mut base.country, &extracted.country),
        (&mut base.city, &extracted.city),
        (&mut base.postal_code, &extracted.postal_code),
        (&mut base.category, &extracted.category),
    ];
    for (slot, value) in pairs {
        if !value.is_empty() {
            slot.clone_from(value);
        }
    }
    if extracted.total_experience > 0 {
        base.total_experience = extracted.total_experience;
    }
}

/// Status after an extraction attempt.
pub fn status_after(parsed: &ParsedResume, has_file: bool) -> &'static str {
    if !parsed.is_empty() {
        STATUS_PARSED
    } else if has_file {
        STATUS_UPLOADED
    } else {
        STATUS_CREATED
    }
}

pub fn profile_of(row: &resume::Model) -> ProfileFields {
    ProfileFields {
        first_name: row.first_name.clone(),
        last_name: row.last_name.clone(),
        email: row.email.clone(),
        phone: row.phone.clone(),
        linkedin: row.linkedin.clone(),
        github: row.github.clone(),
        portfolio: row.portfolio.clone(),
        address: row.address.clone(),
        headline: row.headline.clone(),
        summary: row.summary.clone(),
        country: row.country.clone(),
        city: row.city.clone(),
        postal_code: row.postal_code.clone(),
        category: row.category.clone(),
        total_experience: row.total_experience,
        status: row.status.clone(),
    }
}

fn set_profile(model: &mut resume::ActiveModel, p: &ProfileFields) {
    model.first_name = Set(p.first_name.clone());
    model.last_name = Set(p.last_name.clone());
    model.email = Set(p.email.clone());
    model.phone = Set(p.phone.clone());
    model.linkedin = Set(p.linkedin.clone());
    model.github = Set(p.github.clone());
    model.portfolio = Set(p.portfolio.clone());
    model.address = Set(p.address.clone());
    model.headline = Set(p.headline.clone());
    model.summary = Set(p.summary.clone());
    model.country = Set(p.country.clone());
    model.city = Set(p.city.clone());
    model.postal_code = Set(p.postal_code.clone());
    model.category = Set(p.category.clone());
    model.total_experience = Set(Ord::max(p.total_experience, 0));
    model.status = Set(p.status.clone());
}

pub async fn insert_resume<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    profile: &ProfileFields,
    now: DateTime<Utc>,
) -> Result<resume::Model, DbErr> {
    let mut model = resume::ActiveModel {
        id: Set(id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    set_profile(&mut model, profile);
    model.insert(db).await
}

pub async fn update_profile<C: ConnectionTrait>(
    db: &C,
    row: resume::Model,
    profile: &ProfileFields,
) -> Result<resume::Model, DbErr> {
    let mut model: resume::ActiveModel = row.into();
    set_profile(&mut model, profile);
    model.updated_at = Set(Utc::now());
    model.update(db).await
}

pub async fn insert_file<C: ConnectionTrait>(
    db: &C,
    resume_id: Uuid,
    file: &StoredFile,
) -> Result<resume_file::Model, DbErr> {
    resume_file::ActiveModel {
        id: Set(Uuid::now_v7()),
        resume_id: Set(resume_id),
        content_hash: Set(file.content_hash.clone()),
        filename: Set(file.filename.clone()),
        content_type: Set(file.content_type.clone()),
        size: Set(file.size),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Insert the child rows of `parsed`, honoring `policy` for existing rows.
pub async fn store_children<C: ConnectionTrait>(
    db: &C,
    resume_id: Uuid,
    parsed: &ParsedResume,
    policy: ChildRecordPolicy,
) -> Result<(), DbErr> {
    if policy == ChildRecordPolicy::Replace {
        delete_children(db, resume_id).await?;
    }

    if !parsed.skills.is_empty() {
        skill::Entity::insert_many(parsed.skills.iter().map(|s| skill::ActiveModel {
            name: Set(s.name.clone()),
            proficiency: Set(s.proficiency),
            years_of_experience: Set(Ord::max(s.years_of_experience, 0)),
            resume_id: Set(resume_id),
            ..Default::default()
        }))
        .exec(db)
        .await?;
    }

    if !parsed.education.is_empty() {
        education::Entity::insert_many(parsed.education.iter().map(|e| {
            education::ActiveModel {
                degree: Set(e.degree.clone()),
                institution: Set(e.institution.clone()),
                field_of_study: Set(e.field_of_study.clone()),
                start_year: Set(Ord::max(e.start_year, 0)),
                end_year: Set(Ord::max(e.end_year, 0)),
                resume_id: Set(resume_id),
                ..Default::default()
            }
        }))
        .exec(db)
        .await?;
    }

    if !parsed.projects.is_empty() {
        project::Entity::insert_many(parsed.projects.iter().map(|p| project::ActiveModel {
            title: Set(p.title.clone()),
            description: Set(p.description.clone()),
            technologies: Set(p.technologies.clone()),
            start_date: Set(p.start_date.clone()),
            end_date: Set(p.end_date.clone()),
            project_url: Set(p.project_url.clone()),
            resume_id: Set(resume_id),
            ..Default::default()
        }))
        .exec(db)
        .await?;
    }

    if !parsed.experience.is_empty() {
        work_experience::Entity::insert_many(parsed.experience.iter().map(|w| {
            work_experience::ActiveModel {
                role: Set(w.role.clone()),
                company: Set(w.company.clone()),
                start_date: Set(w.start_date.clone()),
                end_date: Set(w.end_date.date().map(str::to_string)),
                open_ended: Set(w.end_date.is_open_ended()),
                duration: Set(w.duration.clone()),
                description: Set(w.responsibilities.clone()),
                achievements: Set(w.achievements.clone()),
                resume_id: Set(resume_id),
                ..Default::default()
            }
        }))
        .exec(db)
        .await?;
    }

    if !parsed.languages.is_empty() {
        language::Entity::insert_many(parsed.languages.iter().map(|l| language::ActiveModel {
            name: Set(l.name.clone()),
            resume_id: Set(resume_id),
            ..Default::default()
        }))
        .exec(db)
        .await?;
    }

    Ok(())
}

pub async fn delete_children<C: ConnectionTrait>(db: &C, resume_id: Uuid) -> Result<(), DbErr> {
    skill::Entity::delete_many()
        .filter(skill::Column::ResumeId.eq(resume_id))
        .exec(db)
        .await?;
    education::Entity::delete_many()
        .filter(education::Column::ResumeId.eq(resume_id))
        .exec(db)
        .await?;
    project::Entity::delete_many()
        .filter(project::Column::ResumeId.eq(resume_id))
        .exec(db)
        .await?;
    work_experience::Entity::delete_many()
        .filter(work_experience::Column::ResumeId.eq(resume_id))
        .exec(db)
        .await?;
    language::Entity::delete_many()
        .filter(language::Column::ResumeId.eq(resume_id))
        .exec(db)
        .await?;
    Ok(())
}

pub async fn find_file<C: ConnectionTrait>(
    db: &C,
    resume_id: Uuid,
) -> Result<Option<resume_file::Model>, DbErr> {
    resume_file::Entity::find()
        .filter(resume_file::Column::ResumeId.eq(resume_id))
        .one(db)
        .await
}

/// Load a resume and its children in insertion order.
pub async fn load_resume<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<LoadedResume>, DbErr> {
    let Some(row) = resume::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let skills = skill::Entity::find()
        .filter(skill::Column::ResumeId.eq(id))
        .order_by_asc(skill::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(|s| Skill {
            name: s.name,
            proficiency: s.proficiency,
            years_of_experience: s.years_of_experience,
        })
        .collect();

    let education = education::Entity::find()
        .filter(education::Column::ResumeId.eq(id))
        .order_by_asc(education::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(|e| EducationRecord {
            degree: e.degree,
            institution: e.institution,
            field_of_study: e.field_of_study,
            start_year: e.start_year,
            end_year: e.end_year,
        })
        .collect();

    let projects = project::Entity::find()
        .filter(project::Column::ResumeId.eq(id))
        .order_by_asc(project::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(|p| Project {
            title: p.title,
            description: p.description,
            technologies: p.technologies,
            start_date: p.start_date,
            end_date: p.end_date,
            project_url: p.project_url,
        })
        .collect();

    let experience = work_experience::Entity::find()
        .filter(work_experience::Column::ResumeId.eq(id))
        .order_by_asc(work_experience::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(|w| WorkExperience {
            end_date: stored_end_date(w.open_ended, w.end_date),
            role: w.role,
            company: w.company,
            start_date: w.start_date,
            duration: w.duration,
            responsibilities: w.description,
            achievements: w.achievements,
        })
        .collect();

    let languages = language::Entity::find()
        .filter(language::Column::ResumeId.eq(id))
        .order_by_asc(language::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(|l| Language { name: l.name })
        .collect();

    let file = find_file(db, id).await?;

    Ok(Some(LoadedResume {
        parsed: ParsedResume {
            profile: profile_of(&row),
            skills,
            education,
            projects,
            experience,
            languages,
        },
        row,
        file,
    }))
}

fn stored_end_date(open_ended: bool, end_date: Option<String>) -> EndDate {
    if open_ended {
        return EndDate::OpenEnded;
    }
    match end_date {
        Some(date) if !date.trim().is_empty() => EndDate::On(date),
        _ => EndDate::Unknown,
    }
}

/// Delete a resume with its children and file row.
///
/// Returns the removed file row, or `None` if the resume did not exist.
pub async fn delete_resume(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<Option<resume_file::Model>>, DbErr> {
    let txn = db.begin().await?;

    if resume::Entity::find_by_id(id).one(&txn).await?.is_none() {
        return Ok(None);
    }

    let file = find_file(&txn, id).await?;
    delete_children(&txn, id).await?;
    resume_file::Entity::delete_many()
        .filter(resume_file::Column::ResumeId.eq(id))
        .exec(&txn)
        .await?;
    resume::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(Some(file))
}

/// Take the per-document transaction lock on `content_hash`.
///
/// Writing a blob plus inserting its row, and counting rows plus deleting
/// the blob, both run under this lock so neither sees the other half done.
pub async fn lock_document<C: ConnectionTrait>(db: &C, content_hash: &str) -> Result<(), DbErr> {
    db.execute_raw(Statement::from_sql_and_values(
        db.get_database_backend(),
        "SELECT pg_advisory_xact_lock(hashtext($1))",
        [content_hash.into()],
    ))
    .await?;
    Ok(())
}

/// Number of file rows still pointing at `content_hash`.
pub async fn file_references<C: ConnectionTrait>(db: &C, content_hash: &str) -> Result<u64, DbErr> {
    resume_file::Entity::find()
        .filter(resume_file::Column::ContentHash.eq(content_hash))
        .count(db)
        .await
}
