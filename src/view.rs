//! Visibility rules. Everything here is a pure function of already
//! loaded rows; callers translate a failed read check into `NotFound`
//! so hidden polls are indistinguishable from absent ones.

use chrono::{DateTime, Utc};

use crate::identity::Viewer;
use crate::models::poll::{Poll, PollStatus};
use crate::models::question::{Question, QuestionStatus};

/// A poll is readable by its owner in any state and by everyone else
/// only while published.
pub fn can_read(poll: &Poll, viewer: &Viewer) -> bool {
    poll.status == PollStatus::Published || viewer.is_user(&poll.owner_user_id)
}

/// Status changes and detail edits are owner-only.
pub fn can_manage(poll: &Poll, viewer: &Viewer) -> bool {
    viewer.is_user(&poll.owner_user_id)
}

/// The question list as seen by `viewer`: the owner sees every
/// question, everyone else only published ones.
pub fn visible_questions(poll: &Poll, questions: Vec<Question>, viewer: &Viewer) -> Vec<Question> {
    if viewer.is_user(&poll.owner_user_id) {
        questions
    } else {
        questions
            .into_iter()
            .filter(|q| q.status == QuestionStatus::Published)
            .collect()
    }
}

/// Whether the poll's end date has passed. Polls without one never
/// expire. Expiry is a read-time predicate, not a stored transition.
pub fn is_expired(poll: &Poll, now: DateTime<Utc>) -> bool {
    match poll.end_date.as_deref() {
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(end) => end.with_timezone(&Utc) <= now,
            Err(_) => false,
        },
        None => false,
    }
}

/// A question accepts votes while its poll is published, the question
/// itself is published, and the poll has not expired.
pub fn voting_open(poll: &Poll, question: &Question, now: DateTime<Utc>) -> bool {
    poll.status == PollStatus::Published
        && question.status == QuestionStatus::Published
        && !is_expired(poll, now)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poll(owner: &str, status: PollStatus, end_date: Option<&str>) -> Poll {
        Poll {
            id: 1,
            title: "Lunch".into(),
            description: String::new(),
            owner_user_id: owner.into(),
            status,
            end_date: end_date.map(String::from),
            created_at: "2026-01-10T09:00:00Z".into(),
        }
    }

    fn question(status: QuestionStatus) -> Question {
        Question {
            id: 7,
            poll_id: 1,
            text: "Where?".into(),
            position: 0,
            status,
            created_at: "2026-01-10T09:00:00Z".into(),
        }
    }

    fn at(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn owner_reads_poll_in_any_state() {
        let viewer = Viewer::User("u1".into());
        for status in [PollStatus::Unpublished, PollStatus::Published, PollStatus::Inactive] {
            assert!(can_read(&poll("u1", status, None), &viewer));
        }
    }

    #[test]
    fn non_owner_reads_published_only() {
        let viewer = Viewer::User("u2".into());
        assert!(can_read(&poll("u1", PollStatus::Published, None), &viewer));
        assert!(!can_read(&poll("u1", PollStatus::Unpublished, None), &viewer));
        assert!(!can_read(&poll("u1", PollStatus::Inactive, None), &viewer));
    }

    #[test]
    fn anonymous_reads_published_only() {
        assert!(can_read(&poll("u1", PollStatus::Published, None), &Viewer::Anonymous));
        assert!(!can_read(&poll("u1", PollStatus::Unpublished, None), &Viewer::Anonymous));
    }

    #[test]
    fn manage_is_owner_only() {
        let p = poll("u1", PollStatus::Published, None);
        assert!(can_manage(&p, &Viewer::User("u1".into())));
        assert!(!can_manage(&p, &Viewer::User("u2".into())));
        assert!(!can_manage(&p, &Viewer::Anonymous));
    }

    #[test]
    fn question_filter_hides_inactive_from_non_owners() {
        let p = poll("u1", PollStatus::Published, None);
        let questions = vec![question(QuestionStatus::Published), question(QuestionStatus::Inactive)];

        let for_owner = visible_questions(&p, questions.clone(), &Viewer::User("u1".into()));
        assert_eq!(for_owner.len(), 2);

        let for_other = visible_questions(&p, questions, &Viewer::User("u2".into()));
        assert_eq!(for_other.len(), 1);
        assert_eq!(for_other[0].status, QuestionStatus::Published);
    }

    #[test]
    fn expiry_needs_an_end_date() {
        let now = at("2026-06-01T12:00:00Z");
        assert!(!is_expired(&poll("u1", PollStatus::Published, None), now));
        assert!(is_expired(&poll("u1", PollStatus::Published, Some("2026-05-31T00:00:00Z")), now));
        assert!(!is_expired(&poll("u1", PollStatus::Published, Some("2026-06-02T00:00:00Z")), now));
    }

    #[test]
    fn voting_requires_both_published_and_unexpired() {
        let now = at("2026-06-01T12:00:00Z");
        let open = poll("u1", PollStatus::Published, None);
        assert!(voting_open(&open, &question(QuestionStatus::Published), now));
        assert!(!voting_open(&open, &question(QuestionStatus::Inactive), now));
        assert!(!voting_open(
            &poll("u1", PollStatus::Unpublished, None),
            &question(QuestionStatus::Published),
            now
        ));
        assert!(!voting_open(
            &poll("u1", PollStatus::Published, Some("2026-01-01T00:00:00Z")),
            &question(QuestionStatus::Published),
            now
        ));
    }
}
