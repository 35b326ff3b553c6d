use foodvision_core::{
    update, AppState, Effect, Job, JobId, JobStatus, Msg, NutrientRecord, NutrientUnit, Phase,
    PollObservation, UploadOutcome,
};

fn init_logging() {
    foodvision_logging::initialize_for_tests();
}

fn job(id: &str) -> Job {
    Job::new(JobId::new(id), vec![0xFF, 0xD8, 0xFF], 0)
}

fn accepted(state: AppState, id: &str) -> AppState {
    let (state, _) = update(state, Msg::SubmitClicked);
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            job_id: JobId::new(id),
            outcome: UploadOutcome::Accepted,
        },
    );
    state
}

#[test]
fn reselecting_while_polling_stops_the_old_poll() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ArtifactSelected(job("old")));
    let state = accepted(state, "old");
    assert_eq!(state.phase(), Phase::Polling);

    let (state, effects) = update(state, Msg::ArtifactSelected(job("new")));
    assert_eq!(state.phase(), Phase::Idle);
    assert_eq!(state.current_job_id(), Some(&JobId::new("new")));
    assert_eq!(
        effects,
        vec![Effect::StopPolling {
            job_id: JobId::new("old")
        }]
    );
}

#[test]
fn late_status_for_old_job_never_mutates_state() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ArtifactSelected(job("old")));
    let state = accepted(state, "old");
    let (mut state, _) = update(state, Msg::ArtifactSelected(job("new")));
    assert!(state.consume_dirty());
    let before = state.clone();

    for observation in [
        PollObservation::Status(JobStatus::Success(2)),
        PollObservation::Status(JobStatus::Failure("late".to_string())),
        PollObservation::Status(JobStatus::Processing),
    ] {
        let (next, effects) = update(
            state.clone(),
            Msg::StatusObserved {
                job_id: JobId::new("old"),
                observation,
            },
        );
        assert_eq!(next, before);
        assert!(effects.is_empty());
    }
}

#[test]
fn late_status_for_old_job_is_ignored_while_new_job_polls() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ArtifactSelected(job("old")));
    let state = accepted(state, "old");
    let (state, _) = update(state, Msg::ArtifactSelected(job("new")));
    let state = accepted(state, "new");

    let (state, effects) = update(
        state,
        Msg::StatusObserved {
            job_id: JobId::new("old"),
            observation: PollObservation::Status(JobStatus::Failure("stale".to_string())),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Polling);
    assert_eq!(state.current_job_id(), Some(&JobId::new("new")));
}

#[test]
fn late_upload_and_enrichment_results_are_dropped_after_reset() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ArtifactSelected(job("a")));
    let (state, _) = update(state, Msg::SubmitClicked);
    let (mut state, _) = update(state, Msg::ResultDismissed);
    assert!(state.consume_dirty());

    let (mut state, effects) = update(
        state,
        Msg::UploadFinished {
            job_id: JobId::new("a"),
            outcome: UploadOutcome::Accepted,
        },
    );
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());

    let (mut state, effects) = update(
        state,
        Msg::EnrichmentFinished {
            job_id: JobId::new("a"),
            nutrients: vec![NutrientRecord {
                name: "Energy".to_string(),
                value: 250.0,
                unit: NutrientUnit::Kcal,
            }],
        },
    );
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
    assert_eq!(state.view(), Default::default());
}

#[test]
fn results_for_the_current_job_in_the_wrong_phase_are_ignored() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ArtifactSelected(job("c")));
    let before = state.clone();

    // Not submitted yet: no upload result or poll tick can apply.
    let (next, effects) = update(
        state,
        Msg::StatusObserved {
            job_id: JobId::new("c"),
            observation: PollObservation::Status(JobStatus::Success(0)),
        },
    );
    assert_eq!(next, before);
    assert!(effects.is_empty());
}
