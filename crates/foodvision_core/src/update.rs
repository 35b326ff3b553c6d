use crate::{
    AppState, Category, Effect, Job, JobId, Msg, PollState, Session, SessionError,
    UploadOutcome,
};

/// Pure update function: applies a message to state and returns any effects.
///
/// Messages from background work carry the job id they were started for. Any
/// message whose id is not the current job's is dropped without touching state.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    if let Some(job_id) = msg.job_id() {
        if state.current_job_id() != Some(job_id) {
            return (state, Vec::new());
        }
    }

    let effects = match msg {
        Msg::ArtifactSelected(job) => {
            let effects = stop_active_poll(&state);
            state.transition(Session::Idle { job: Some(job) });
            effects
        }
        Msg::ResultDismissed => {
            let effects = stop_active_poll(&state);
            state.transition(Session::Idle { job: None });
            effects
        }
        Msg::SubmitClicked => match state.session() {
            Session::Idle { job: Some(job) } => {
                let job = job.clone();
                let effect = Effect::Upload {
                    job_id: job.id.clone(),
                    payload: job.payload.clone(),
                };
                state.transition(Session::Uploading { job });
                vec![effect]
            }
            _ => Vec::new(),
        },
        Msg::EncodingFailed { message, .. } => match state.session() {
            Session::Idle { job: Some(job) } | Session::Uploading { job } => {
                let job = job.clone();
                state.transition(Session::Failed {
                    job,
                    error: SessionError::Encoding(message),
                });
                Vec::new()
            }
            _ => Vec::new(),
        },
        Msg::UploadFinished { outcome, .. } => match state.session() {
            Session::Uploading { job } => {
                let job = job.clone();
                match outcome {
                    UploadOutcome::Accepted => {
                        let job_id = job.id.clone();
                        state.transition(Session::Polling {
                            job,
                            poll: PollState::arm(),
                        });
                        vec![Effect::StartPolling { job_id }]
                    }
                    UploadOutcome::Rejected { status } => {
                        state.transition(Session::Failed {
                            job,
                            error: SessionError::UploadRejected { status },
                        });
                        Vec::new()
                    }
                }
            }
            _ => Vec::new(),
        },
        Msg::StatusObserved { observation, .. } => match state.session() {
            Session::Polling { job, poll } => {
                let (job, next) = (job.clone(), poll.observe(&observation));
                apply_poll_state(&mut state, job, next)
            }
            _ => Vec::new(),
        },
        Msg::PollExhausted { attempts, .. } => match state.session() {
            Session::Polling { job, .. } => {
                let job = job.clone();
                let job_id = job.id.clone();
                state.transition(Session::Failed {
                    job,
                    error: SessionError::PollTimeout { attempts },
                });
                vec![Effect::StopPolling { job_id }]
            }
            _ => Vec::new(),
        },
        Msg::EnrichmentFinished { nutrients, .. } => match state.session() {
            Session::Enriching { job, category } => {
                let (job, category) = (job.clone(), *category);
                state.transition(Session::Done {
                    job,
                    category,
                    nutrients,
                });
                Vec::new()
            }
            _ => Vec::new(),
        },
    };

    (state, effects)
}

fn stop_active_poll(state: &AppState) -> Vec<Effect> {
    state
        .polling_job_id()
        .map(|job_id| Effect::StopPolling {
            job_id: job_id.clone(),
        })
        .into_iter()
        .collect()
}

fn apply_poll_state(state: &mut AppState, job: Job, poll: PollState) -> Vec<Effect> {
    let job_id: JobId = job.id.clone();
    match poll {
        PollState::Succeeded(index) => match Category::from_index(index) {
            Some(category) => {
                state.transition(Session::Enriching { job, category });
                vec![
                    Effect::StopPolling {
                        job_id: job_id.clone(),
                    },
                    Effect::Enrich { job_id, category },
                ]
            }
            None => {
                state.transition(Session::Failed {
                    job,
                    error: SessionError::InvalidResult(format!(
                        "class index {index} is outside 0..={}",
                        Category::ALL.len() - 1
                    )),
                });
                vec![Effect::StopPolling { job_id }]
            }
        },
        PollState::Failed(message) => {
            state.transition(Session::Failed {
                job,
                error: SessionError::Classification(message),
            });
            vec![Effect::StopPolling { job_id }]
        }
        PollState::Malformed(reason) => {
            state.transition(Session::Failed {
                job,
                error: SessionError::InvalidResult(reason),
            });
            vec![Effect::StopPolling { job_id }]
        }
        PollState::Idle | PollState::Armed | PollState::Pending | PollState::Processing => {
            state.transition(Session::Polling { job, poll });
            Vec::new()
        }
    }
}
