use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use common::{ParsedResume, ProfileFields};
use common::mapper::{ResumeView, to_view};
use common::storage::ContentHash;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::config::ChildRecordPolicy;
use crate::entity::{resume, resume_file};
use crate::error::{AppError, ErrorBody};
use crate::models::resume::*;
use crate::services::pipeline::parse_document;
use crate::services::resume_store::{self, LoadedResume, StoredFile};
use crate::state::AppState;

/// Multipart framing on top of the largest accepted document.
pub fn resume_body_limit(max_upload_size: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_upload_size + 64 * 1024)
}

struct Upload {
    filename: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

struct ResumeForm {
    profile: ProfileInput,
    file: Option<Upload>,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("Multipart error: {e}"))
    }
}

async fn read_form(mut multipart: Multipart) -> Result<ResumeForm, AppError> {
    let mut profile = ProfileInput::default();
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "file" {
            let filename = field
                .file_name()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "upload".to_string());
            let content_type = field
                .content_type()
                .map(str::to_string)
                .or_else(|| mime_guess::from_path(&filename).first().map(|m| m.to_string()));
            let bytes = field.bytes().await.map_err(multipart_error)?;
            // Browsers send an empty part for an untouched file input.
            if !bytes.is_empty() {
                file = Some(Upload {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field.text().await.map_err(multipart_error)?;
        if !profile.set(&name, value) {
            tracing::debug!(field = %name, "Ignoring unknown form field");
        }
    }

    Ok(ResumeForm { profile, file })
}

async fn find_loaded(db: &DatabaseConnection, id: Uuid) -> Result<LoadedResume, AppError> {
    resume_store::load_resume(db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

/// Fetch the stored document of a resume and run it through the pipeline.
async fn parse_stored(state: &AppState, loaded: &LoadedResume) -> Result<ParsedResume, AppError> {
    let file = loaded
        .file
        .as_ref()
        .ok_or_else(|| AppError::NotFound(format!("Resume {} has no document", loaded.row.id)))?;
    let hash = ContentHash::from_hex(&file.content_hash)?;
    let bytes = state.documents.get(&hash).await?;

    Ok(parse_document(
        &*state.extractor,
        state.config.ai.schema_version,
        &file.filename,
        bytes,
    )
    .await)
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Resumes",
    operation_id = "createResume",
    summary = "Upload a resume",
    description = "Creates a resume from a multipart form. The optional `file` part (PDF or DOCX) is stored, \
        its text is extracted and sent to the AI service, and the mapped fields and child records are persisted. \
        Text parts (`first_name`, `last_name`, `full_name`, `email`, `phone`, `linkedin`, `github`, `portfolio`, \
        `address`, `category`, `total_experience`, `headline`, `summary`, `country`, `city`, `postal_code`) seed the \
        profile; extracted values replace them only when non-empty. Unknown parts are ignored. \
        Extraction problems never fail the request.",
    request_body(content_type = "multipart/form-data", description = "Optional `file` plus profile text fields"),
    responses(
        (status = 201, description = "Resume created", body = CreateResumeResponse),
        (status = 400, description = "Malformed multipart body (VALIDATION_ERROR)", body = ErrorBody),
        (status = 413, description = "Document too large (PAYLOAD_TOO_LARGE)", body = ErrorBody),
        (status = 422, description = "Invalid fields (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn create_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = read_form(multipart).await?;
    let mut profile = form.profile.validate(form.file.is_some())?;

    let max_size = state.config.storage.max_upload_size;
    if let Some(upload) = &form.file
        && upload.bytes.len() > max_size
    {
        return Err(AppError::PayloadTooLarge(format!(
            "Document is {} bytes; the limit is {max_size}",
            upload.bytes.len()
        )));
    }

    let parsed = match &form.file {
        Some(upload) => {
            parse_document(
                &*state.extractor,
                state.config.ai.schema_version,
                &upload.filename,
                upload.bytes.clone(),
            )
            .await
        }
        None => ParsedResume::default(),
    };

    resume_store::merge_profile(&mut profile, &parsed.profile);
    profile.status = resume_store::status_after(&parsed, form.file.is_some()).to_string();

    let id = Uuid::now_v7();
    if let Err(e) = persist_new_resume(&state, id, &profile, form.file.as_ref(), &parsed).await {
        if let Some(upload) = &form.file {
            warn!(
                %id,
                hash = %ContentHash::compute(&upload.bytes),
                "Resume was not saved; its stored document may be unreferenced"
            );
        }
        return Err(e);
    }

    tracing::info!(%id, status = %profile.status, "Resume created");

    let loaded = find_loaded(&state.db, id).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateResumeResponse {
            id,
            message: "Resume uploaded successfully".into(),
            data: loaded.into(),
        }),
    ))
}

/// Row offset of `page`, kept within Postgres' `BIGINT`.
fn page_offset(page: u64, per_page: u64) -> u64 {
    Ord::min((page - 1).saturating_mul(per_page), i64::MAX as u64)
}

/// Insert the resume, its document and its children in one transaction.
///
/// The blob is written under the document lock so a concurrent release of
/// identical bytes cannot remove it before the `resume_file` row commits.
async fn persist_new_resume(
    state: &AppState,
    id: Uuid,
    profile: &ProfileFields,
    upload: Option<&Upload>,
    parsed: &ParsedResume,
) -> Result<(), AppError> {
    let txn = state.db.begin().await?;
    resume_store::insert_resume(&txn, id, profile, Utc::now()).await?;

    if let Some(upload) = upload {
        let hash = ContentHash::compute(&upload.bytes).to_hex();
        resume_store::lock_document(&txn, &hash).await?;
        state.documents.put(&upload.bytes).await?;
        let file = StoredFile {
            content_hash: hash,
            filename: upload.filename.clone(),
            content_type: upload.content_type.clone(),
            size: upload.bytes.len() as i64,
        };
        resume_store::insert_file(&txn, id, &file).await?;
    }

    resume_store::store_children(&txn, id, parsed, ChildRecordPolicy::Append).await?;
    txn.commit().await?;
    Ok(())
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Resumes",
    operation_id = "listResumes",
    summary = "List resumes with pagination and search",
    description = "Returns a paginated list of resumes, newest first. `search` matches first name, last name or email, case-insensitively.",
    params(ResumeListQuery),
    responses(
        (status = 200, description = "List of resumes", body = ResumeListResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_resumes(
    State(state): State<AppState>,
    Query(query): Query<ResumeListQuery>,
) -> Result<Json<ResumeListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let mut select = resume::Entity::find();

    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            let pattern = format!("%{}%", term.to_lowercase());
            let like = |col: resume::Column| {
                Expr::expr(Func::lower(Expr::col(col)))
                    .like(LikeExpr::new(pattern.clone()).escape('\\'))
            };
            select = select.filter(
                Condition::any()
                    .add(like(resume::Column::FirstName))
                    .add(like(resume::Column::LastName))
                    .add(like(resume::Column::Email)),
            );
        }
    }

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let data = select
        .order_by_desc(resume::Column::CreatedAt)
        .order_by_desc(resume::Column::Id)
        .select_only()
        .column(resume::Column::Id)
        .column(resume::Column::FirstName)
        .column(resume::Column::LastName)
        .column(resume::Column::Email)
        .column(resume::Column::Headline)
        .column(resume::Column::CreatedAt)
        .offset(Some(page_offset(page, per_page)))
        .limit(Some(per_page))
        .into_model::<ResumeListItem>()
        .all(&state.db)
        .await?;

    Ok(Json(ResumeListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Resumes",
    operation_id = "getResume",
    summary = "Get a resume by ID",
    description = "Returns the persisted profile with all child records in client shape.",
    params(("id" = Uuid, Path, description = "Resume ID")),
    responses(
        (status = 200, description = "Resume details", body = ResumeResponse),
        (status = 404, description = "Resume not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeResponse>, AppError> {
    let loaded = find_loaded(&state.db, id).await?;
    Ok(Json(loaded.into()))
}

#[utoipa::path(
    get,
    path = "/{id}/extraction",
    tag = "Resumes",
    operation_id = "previewResumeExtraction",
    summary = "Extract fields from the stored document",
    description = "Runs text extraction, AI extraction and mapping on the stored document and returns the result without persisting it.",
    params(("id" = Uuid, Path, description = "Resume ID")),
    responses(
        (status = 200, description = "Mapped fields", body = ResumeView),
        (status = 404, description = "Resume or document not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn preview_extraction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeView>, AppError> {
    let loaded = find_loaded(&state.db, id).await?;
    let parsed = parse_stored(&state, &loaded).await?;
    Ok(Json(to_view(&parsed)))
}

#[utoipa::path(
    post,
    path = "/{id}/reextract",
    tag = "Resumes",
    operation_id = "reextractResume",
    summary = "Re-run extraction on the stored document",
    description = "Runs the pipeline on the stored document and persists the result. Existing child records are \
        kept or replaced according to `resume.child_records`. An extraction that yields nothing leaves the resume unchanged.",
    params(("id" = Uuid, Path, description = "Resume ID")),
    responses(
        (status = 200, description = "Updated resume", body = ResumeResponse),
        (status = 404, description = "Resume or document not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn reextract_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeResponse>, AppError> {
    let loaded = find_loaded(&state.db, id).await?;
    let parsed = parse_stored(&state, &loaded).await?;

    if parsed.is_empty() {
        warn!(%id, "Re-extraction produced no data; keeping stored resume");
        return Ok(Json(loaded.into()));
    }

    let mut profile = loaded.parsed.profile.clone();
    resume_store::merge_profile(&mut profile, &parsed.profile);
    profile.status = STATUS_PARSED.to_string();

    let txn = state.db.begin().await?;
    resume_store::update_profile(&txn, loaded.row, &profile).await?;
    resume_store::store_children(&txn, id, &parsed, state.config.resume.child_records).await?;
    txn.commit().await?;

    let loaded = find_loaded(&state.db, id).await?;
    Ok(Json(loaded.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Resumes",
    operation_id = "deleteResume",
    summary = "Delete a resume",
    description = "Deletes the resume, its child records and its document reference. The stored bytes are removed once no resume refers to them.",
    params(("id" = Uuid, Path, description = "Resume ID")),
    responses(
        (status = 204, description = "Resume deleted"),
        (status = 404, description = "Resume not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let file = resume_store::delete_resume(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

    if let Some(file) = file {
        release_document(&state, &file).await;
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Remove stored bytes nobody refers to any more. Failures only leave an orphan blob.
async fn release_document(state: &AppState, file: &resume_file::Model) {
    if let Err(e) = try_release_document(state, &file.content_hash).await {
        warn!(error = ?e, hash = %file.content_hash, "Failed to release stored document");
    }
}

async fn try_release_document(state: &AppState, content_hash: &str) -> Result<(), AppError> {
    let hash = ContentHash::from_hex(content_hash)?;

    let txn = state.db.begin().await?;
    resume_store::lock_document(&txn, content_hash).await?;
    if resume_store::file_references(&txn, content_hash).await? == 0 {
        state.documents.delete(&hash).await?;
    }
    txn.commit().await?;
    Ok(())
}
