use serde_json::{Value, json};

use crate::common::{TestApp, TestOptions, docx, routes};
use server::config::ChildRecordPolicy;

fn ai_fields() -> Value {
    json!({
        "firstName": "Asha",
        "lastName": "Rao",
        "contact": {"email": "a@b.com", "github": "github.com/asha"},
        "totalExperience": "6",
        "skills": [{"name": "Go", "proficiency": "EXPERT", "yearsOfExperience": "5"}],
        "workExperience": [{
            "company": "Acme",
            "role": "Eng",
            "startDate": "2020-01-01",
            "endDate": "Present",
            "achievements": ["Led team", "Shipped v2"]
        }],
        "education": [{}],
        "projects": [{"name": "Parser", "technologies": ["Rust", "Go"]}],
        "languages": ["English", {"name": "Hindi"}]
    })
}

async fn app_with_ai(child_records: ChildRecordPolicy) -> TestApp {
    TestApp::spawn_with(TestOptions {
        ai_response: ai_fields(),
        child_records,
        ..Default::default()
    })
    .await
}

fn resume_docx() -> Vec<u8> {
    docx(&["Asha Rao", "Backend engineer at Acme"])
}

mod creation {
    use super::*;

    #[tokio::test]
    async fn docx_upload_is_extracted_and_persisted() {
        let app = app_with_ai(ChildRecordPolicy::Append).await;

        let res = app
            .upload_resume(
                Some(("cv.docx", resume_docx())),
                &[("first_name", "Form"), ("city", "Pune")],
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["message"], "Resume uploaded successfully");
        assert_eq!(res.body["id"], res.body["data"]["id"]);
        assert_eq!(app.extractor.calls(), 1);

        let data = &res.body["data"];
        assert_eq!(data["first_name"], "Asha");
        assert_eq!(data["last_name"], "Rao");
        assert_eq!(data["email"], "a@b.com");
        assert_eq!(data["github"], "github.com/asha");
        assert_eq!(data["city"], "Pune");
        assert_eq!(data["total_experience"], 6);
        assert_eq!(data["status"], "parsed");

        assert_eq!(data["skills"], json!([{"name": "Go", "proficiency": "expert", "years_of_experience": 5}]));
        assert_eq!(data["work_experience"][0]["title"], "Eng");
        assert_eq!(data["work_experience"][0]["end_date"], "Present");
        assert_eq!(
            data["work_experience"][0]["achievements"],
            json!(["Led team", "Shipped v2"])
        );
        assert_eq!(
            data["education"],
            json!([{"degree": "", "institution": "", "field_of_study": "", "start_year": 0, "end_year": 0}])
        );
        assert_eq!(data["projects"][0]["title"], "Parser");
        assert_eq!(data["projects"][0]["technologies"], "Rust, Go");
        assert_eq!(data["languages"], json!([{"name": "English"}, {"name": "Hindi"}]));

        assert_eq!(data["file"]["filename"], "cv.docx");
        assert_eq!(data["file"]["size"], resume_docx().len() as u64);
        assert_eq!(data["file"]["content_hash"].as_str().unwrap().len(), 64);
    }

    #[tokio::test]
    async fn unsupported_file_skips_ai_and_keeps_form_values() {
        let app = app_with_ai(ChildRecordPolicy::Append).await;

        let res = app
            .upload_resume(
                Some(("notes.txt", b"Asha Rao, Go developer".to_vec())),
                &[("email", "form@example.com")],
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(app.extractor.calls(), 0);
        let data = &res.body["data"];
        assert_eq!(data["email"], "form@example.com");
        assert_eq!(data["first_name"], "");
        assert_eq!(data["status"], "uploaded");
        assert_eq!(data["skills"], json!([]));
        assert_eq!(data["work_experience"], json!([]));
        assert_eq!(data["file"]["filename"], "notes.txt");
    }

    #[tokio::test]
    async fn empty_ai_response_yields_profile_without_children() {
        let app = TestApp::spawn().await;

        let id = app
            .create_resume(Some(("cv.docx", resume_docx())), &[])
            .await;
        assert_eq!(app.extractor.calls(), 1);

        let res = app.get(&routes::resume(&id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "uploaded");
        assert_eq!(res.body["skills"], json!([]));
        assert_eq!(app.child_rows("skill", &id).await, 0);
    }

    #[tokio::test]
    async fn form_only_resume_splits_full_name() {
        let app = TestApp::spawn().await;

        let res = app
            .upload_resume(None, &[("full_name", "Asha Devi Rao"), ("total_experience", "3")])
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        let data = &res.body["data"];
        assert_eq!(data["first_name"], "Asha");
        assert_eq!(data["last_name"], "Devi Rao");
        assert_eq!(data["total_experience"], 3);
        assert_eq!(data["status"], "created");
        assert!(data["file"].is_null());
        assert_eq!(app.extractor.calls(), 0);
    }

    #[tokio::test]
    async fn unknown_form_fields_are_ignored() {
        let app = TestApp::spawn().await;

        let res = app
            .upload_resume(None, &[("email", "a@b.com"), ("favourite_colour", "green")])
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["data"].get("favourite_colour").is_none());
    }
}

mod validation {
    use super::*;

    #[tokio::test]
    async fn nothing_identifying_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.upload_resume(None, &[("city", "Pune")]).await;

        assert_eq!(res.status, 422, "{}", res.text);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["errors"][0]["field"], "file");
    }

    #[tokio::test]
    async fn all_violations_are_reported_together() {
        let app = TestApp::spawn().await;

        let res = app
            .upload_resume(
                None,
                &[("email", "not-an-email"), ("total_experience", "-2")],
            )
            .await;

        assert_eq!(res.status, 422, "{}", res.text);
        let fields: Vec<&str> = res.body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["email", "total_experience"]);
    }

    #[tokio::test]
    async fn oversized_document_is_rejected() {
        let app = TestApp::spawn_with(TestOptions {
            max_upload_size: 1024,
            ..Default::default()
        })
        .await;

        let res = app
            .upload_resume(Some(("cv.pdf", vec![b'x'; 4096])), &[])
            .await;

        assert_eq!(res.status, 413, "{}", res.text);
        assert_eq!(res.body["code"], "PAYLOAD_TOO_LARGE");
    }
}

mod retrieval {
    use super::*;

    #[tokio::test]
    async fn unknown_resume_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .get(&routes::resume("0190b5a4-0000-7000-8000-000000000000"))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn list_paginates_and_searches() {
        let app = TestApp::spawn().await;
        app.create_resume(None, &[("first_name", "Asha"), ("email", "asha@example.com")])
            .await;
        app.create_resume(None, &[("first_name", "Ravi"), ("email", "ravi@example.com")])
            .await;
        app.create_resume(None, &[("last_name", "Ashar")]).await;

        let res = app.get(&format!("{}?per_page=2", routes::RESUMES)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["data"].as_array().unwrap().len(), 2);
        assert_eq!(res.body["pagination"]["total"], 3);
        assert_eq!(res.body["pagination"]["total_pages"], 2);
        // Newest first.
        assert_eq!(res.body["data"][0]["last_name"], "Ashar");

        let res = app.get(&format!("{}?search=ASHA", routes::RESUMES)).await;
        assert_eq!(res.body["pagination"]["total"], 2);

        let res = app.get(&format!("{}?search=ravi%40", routes::RESUMES)).await;
        assert_eq!(res.body["pagination"]["total"], 1);
        assert_eq!(res.body["data"][0]["first_name"], "Ravi");
    }

    #[tokio::test]
    async fn page_far_past_the_end_is_empty() {
        let app = TestApp::spawn().await;
        app.create_resume(None, &[("first_name", "Asha")]).await;

        let res = app
            .get(&format!("{}?page={}&per_page=100", routes::RESUMES, u64::MAX))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"], json!([]));
        assert_eq!(res.body["pagination"]["total"], 1);
    }
}

mod extraction {
    use super::*;

    #[tokio::test]
    async fn preview_does_not_persist() {
        let app = app_with_ai(ChildRecordPolicy::Append).await;
        let id = app
            .create_resume(Some(("cv.docx", resume_docx())), &[])
            .await;

        let res = app.get(&routes::resume_extraction(&id)).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["email"], "a@b.com");
        assert_eq!(res.body["work_experience"][0]["end_date"], "Present");
        assert_eq!(app.extractor.calls(), 2);

        assert_eq!(app.child_rows("skill", &id).await, 1);
    }

    #[tokio::test]
    async fn preview_without_document_is_not_found() {
        let app = TestApp::spawn().await;
        let id = app.create_resume(None, &[("email", "a@b.com")]).await;

        let res = app.get(&routes::resume_extraction(&id)).await;
        assert_eq!(res.status, 404, "{}", res.text);

        let res = app.post_empty(&routes::resume_reextract(&id)).await;
        assert_eq!(res.status, 404, "{}", res.text);
    }

    #[tokio::test]
    async fn reextract_appends_by_default() {
        let app = app_with_ai(ChildRecordPolicy::Append).await;
        let id = app
            .create_resume(Some(("cv.docx", resume_docx())), &[])
            .await;

        let res = app.post_empty(&routes::resume_reextract(&id)).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["skills"].as_array().unwrap().len(), 2);
        assert_eq!(res.body["languages"].as_array().unwrap().len(), 4);
        assert_eq!(app.child_rows("work_experience", &id).await, 2);
    }

    #[tokio::test]
    async fn reextract_replaces_when_configured() {
        let app = app_with_ai(ChildRecordPolicy::Replace).await;
        let id = app
            .create_resume(Some(("cv.docx", resume_docx())), &[])
            .await;

        let res = app.post_empty(&routes::resume_reextract(&id)).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["skills"].as_array().unwrap().len(), 1);
        assert_eq!(res.body["status"], "parsed");
        assert_eq!(app.child_rows("language", &id).await, 2);
    }
}

mod deletion {
    use super::*;

    #[tokio::test]
    async fn delete_removes_resume_and_children() {
        let app = app_with_ai(ChildRecordPolicy::Append).await;
        let id = app
            .create_resume(Some(("cv.docx", resume_docx())), &[])
            .await;
        assert_eq!(app.child_rows("skill", &id).await, 1);

        let res = app.delete(&routes::resume(&id)).await;
        assert_eq!(res.status, 204, "{}", res.text);

        assert_eq!(app.get(&routes::resume(&id)).await.status, 404);
        assert_eq!(app.child_rows("skill", &id).await, 0);
        assert_eq!(app.child_rows("resume_file", &id).await, 0);

        let res = app.delete(&routes::resume(&id)).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn shared_document_survives_until_last_reference() {
        let app = app_with_ai(ChildRecordPolicy::Append).await;
        let bytes = resume_docx();
        let first = app
            .create_resume(Some(("a.docx", bytes.clone())), &[])
            .await;
        let second = app.create_resume(Some(("b.docx", bytes)), &[]).await;

        assert_eq!(app.delete(&routes::resume(&first)).await.status, 204);

        // Same bytes, same stored blob: the second resume can still be re-read.
        let res = app.get(&routes::resume_extraction(&second)).await;
        assert_eq!(res.status, 200, "{}", res.text);
    }

    #[tokio::test]
    async fn reupload_after_delete_restores_document() {
        let app = app_with_ai(ChildRecordPolicy::Append).await;
        let bytes = resume_docx();
        let first = app
            .create_resume(Some(("a.docx", bytes.clone())), &[])
            .await;
        assert_eq!(app.delete(&routes::resume(&first)).await.status, 204);

        let second = app.create_resume(Some(("b.docx", bytes)), &[]).await;
        let res = app.get(&routes::resume_extraction(&second)).await;
        assert_eq!(res.status, 200, "{}", res.text);
    }

    #[tokio::test]
    async fn concurrent_delete_and_upload_keep_document() {
        let app = app_with_ai(ChildRecordPolicy::Append).await;
        let bytes = resume_docx();

        for _ in 0..10 {
            let old = app
                .create_resume(Some(("old.docx", bytes.clone())), &[])
                .await;
            let old_path = routes::resume(&old);
            let (deleted, created) = tokio::join!(
                app.delete(&old_path),
                app.upload_resume(Some(("new.docx", bytes.clone())), &[]),
            );
            assert_eq!(deleted.status, 204, "{}", deleted.text);
            assert_eq!(created.status, 201, "{}", created.text);

            let res = app.get(&routes::resume_extraction(&created.id())).await;
            assert_eq!(res.status, 200, "{}", res.text);
        }
    }
}
