use docmorph::domain::{
    FileId, Job, JobId, JobStatus, StoragePath, TargetFormat, PROGRESS_CONVERTING, PROGRESS_DONE,
    PROGRESS_QUEUED, PROGRESS_STARTED,
};

#[test]
fn given_new_job_when_created_then_queued_with_initial_progress() {
    let job = Job::new(FileId::new(), TargetFormat::Pdf);

    assert_eq!(job.status, JobStatus::Queued);
    assert_eq!(job.progress, PROGRESS_QUEUED);
    assert!(job.output_filename.is_none());
    assert!(job.error_message.is_none());
}

#[test]
fn given_queued_job_when_started_then_running_with_raised_progress() {
    let mut job = Job::new(FileId::new(), TargetFormat::Pdf);

    job.start().unwrap();

    assert_eq!(job.status, JobStatus::Running);
    assert_eq!(job.progress, PROGRESS_STARTED);
}

#[test]
fn given_running_job_when_completed_then_done_with_full_progress_and_output() {
    let mut job = Job::new(FileId::new(), TargetFormat::Pdf);
    job.start().unwrap();
    job.advance_progress(PROGRESS_CONVERTING).unwrap();

    job.complete("photo.pdf".to_string()).unwrap();

    assert_eq!(job.status, JobStatus::Done);
    assert_eq!(job.progress, PROGRESS_DONE);
    assert_eq!(job.output_filename.as_deref(), Some("photo.pdf"));
    assert!(job.error_message.is_none());
}

#[test]
fn given_running_job_when_failed_then_error_is_recorded_and_no_output() {
    let mut job = Job::new(FileId::new(), TargetFormat::Png);
    job.start().unwrap();

    job.fail("PDF has no pages").unwrap();

    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.error_message.as_deref(), Some("PDF has no pages"));
    assert!(job.output_filename.is_none());
}

#[test]
fn given_queued_job_when_completed_directly_then_transition_is_rejected() {
    let mut job = Job::new(FileId::new(), TargetFormat::Pdf);

    assert!(job.complete("x.pdf".to_string()).is_err());
    assert_eq!(job.status, JobStatus::Queued);
}

#[test]
fn given_running_job_when_started_again_then_transition_is_rejected() {
    let mut job = Job::new(FileId::new(), TargetFormat::Pdf);
    job.start().unwrap();

    assert!(job.start().is_err());
    assert_eq!(job.status, JobStatus::Running);
}

#[test]
fn given_terminal_job_when_any_transition_is_applied_then_it_is_rejected() {
    let mut job = Job::new(FileId::new(), TargetFormat::Pdf);
    job.start().unwrap();
    job.complete("x.pdf".to_string()).unwrap();

    assert!(job.start().is_err());
    assert!(job.advance_progress(99).is_err());
    assert!(job.fail("late failure").is_err());
    assert!(job.complete("y.pdf".to_string()).is_err());
    assert_eq!(job.status, JobStatus::Done);
    assert_eq!(job.progress, PROGRESS_DONE);
}

#[test]
fn given_running_job_when_progress_goes_backwards_then_value_is_kept_at_maximum() {
    let mut job = Job::new(FileId::new(), TargetFormat::Pdf);
    job.start().unwrap();
    job.advance_progress(PROGRESS_CONVERTING).unwrap();

    job.advance_progress(10).unwrap();

    assert_eq!(job.progress, PROGRESS_CONVERTING);
}

#[test]
fn given_running_job_when_progress_hits_hundred_then_it_is_rejected() {
    let mut job = Job::new(FileId::new(), TargetFormat::Pdf);
    job.start().unwrap();

    assert!(job.advance_progress(PROGRESS_DONE).is_err());
}

#[test]
fn given_mixed_case_tokens_when_parsing_target_format_then_parse_is_case_insensitive() {
    assert_eq!("PDF".parse::<TargetFormat>().unwrap(), TargetFormat::Pdf);
    assert_eq!("Png".parse::<TargetFormat>().unwrap(), TargetFormat::Png);
    assert_eq!("jpeg".parse::<TargetFormat>().unwrap(), TargetFormat::Jpg);
    assert_eq!("docx".parse::<TargetFormat>().unwrap(), TargetFormat::Docx);
}

#[test]
fn given_unknown_token_when_parsing_target_format_then_parse_fails() {
    assert!("bmp".parse::<TargetFormat>().is_err());
    assert!("".parse::<TargetFormat>().is_err());
}

#[test]
fn given_hostile_filename_when_building_upload_path_then_separators_are_stripped() {
    let file_id = FileId::new();
    let path = StoragePath::for_upload(&file_id, "../../etc/passwd");

    let key = path.as_str();
    assert!(key.starts_with(&file_id.as_uuid().to_string()));
    assert!(!key.contains('/'));
    assert!(!key.contains('\\'));
}

#[test]
fn given_windows_style_filename_when_building_output_path_then_separators_are_stripped() {
    let job_id = JobId::new();
    let path = StoragePath::for_output(&job_id, "..\\..\\boot.ini");

    assert!(!path.as_str().contains('\\'));
}

#[test]
fn given_two_uploads_of_same_filename_when_building_paths_then_paths_differ() {
    let path_a = StoragePath::for_upload(&FileId::new(), "report.pdf");
    let path_b = StoragePath::for_upload(&FileId::new(), "report.pdf");

    assert_ne!(path_a, path_b);
}
