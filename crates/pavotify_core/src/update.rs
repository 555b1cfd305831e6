use crate::{
    derive_title, DownloadSession, Notice, Outcome, Phase, RejectReason, SessionEffect, SessionMsg,
};

/// Pure update function: applies a message to the session and returns any effects.
///
/// Messages that do not fit the current phase are ignored.
pub fn update(
    mut session: DownloadSession,
    msg: SessionMsg,
) -> (DownloadSession, Vec<SessionEffect>) {
    let effects = match msg {
        SessionMsg::StartRequested {
            source_url,
            destination_path,
        } => {
            if session.phase().is_active() {
                return (
                    session,
                    vec![SessionEffect::Reject(RejectReason::AlreadyRunning)],
                );
            }
            if source_url.trim().is_empty() || destination_path.trim().is_empty() {
                return (
                    session,
                    vec![
                        SessionEffect::Notify(Notice::MissingInput),
                        SessionEffect::Reject(RejectReason::MissingInput),
                    ],
                );
            }

            session.begin(source_url, destination_path);
            session.start_running();
            vec![SessionEffect::BeginTransfer {
                source_url: session.source_url().to_owned(),
                destination_path: session.destination_path().to_owned(),
            }]
        }
        SessionMsg::TransferSucceeded => {
            if session.phase() == Phase::Running && !session.transfer_done() {
                session.mark_transfer_done();
                vec![SessionEffect::WaitStep]
            } else {
                Vec::new()
            }
        }
        SessionMsg::TransferFailed { reason } => {
            if session.phase() == Phase::Running {
                session.fail();
                vec![
                    record(&session, Outcome::Failed),
                    SessionEffect::Notify(Notice::DownloadFailed { reason }),
                    SessionEffect::ScheduleReset {
                        after_display: false,
                    },
                ]
            } else {
                Vec::new()
            }
        }
        SessionMsg::StepElapsed => {
            if session.phase() == Phase::Running && session.transfer_done() {
                if session.advance() >= 100 {
                    session.succeed();
                    vec![
                        record(&session, Outcome::Completed),
                        SessionEffect::Notify(Notice::DownloadCompleted {
                            title: derive_title(session.source_url()),
                        }),
                        SessionEffect::ScheduleReset {
                            after_display: true,
                        },
                    ]
                } else {
                    vec![SessionEffect::WaitStep]
                }
            } else {
                Vec::new()
            }
        }
        SessionMsg::ResetElapsed => {
            if matches!(session.phase(), Phase::Succeeded | Phase::Failed) {
                session = DownloadSession::new();
            }
            Vec::new()
        }
    };

    (session, effects)
}

fn record(session: &DownloadSession, outcome: Outcome) -> SessionEffect {
    SessionEffect::Record {
        source_url: session.source_url().to_owned(),
        destination_path: session.destination_path().to_owned(),
        outcome,
    }
}
