use std::sync::Arc;

use chrono::Utc;

use worksphere_auth::{
    AccessError, DenyReason, ErrorCode, InvitationDecision, MembershipState, MembershipStatus, RequestContext,
    Role, Visibility, WorkspaceSelector,
};
use worksphere_core::{ExpenseId, UserId, WorkspaceId};
use worksphere_events::{AuditAction, AuditEvent, CollectingAuditSink};
use worksphere_workspace::{ExpensePatch, Signup, DEFAULT_WORKSPACE_NAME};

use super::*;
use crate::password::Argon2Hasher;
use crate::store::{InMemoryWorkspaceStore, StoreError, WorkspaceStore};

struct Harness {
    service: WorkspaceService,
    store: Arc<InMemoryWorkspaceStore>,
    sink: Arc<CollectingAuditSink>,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryWorkspaceStore::new());
    let sink = Arc::new(CollectingAuditSink::new());
    let service = WorkspaceService::new(store.clone(), Arc::new(Argon2Hasher::fast())).with_audit_sink(sink.clone());
    Harness { service, store, sink }
}

async fn signup(h: &Harness, email: &str) -> Account {
    h.service
        .signup(Signup::new(email, "correct horse", None).unwrap())
        .await
        .unwrap()
}

/// Owner invites `email` with `role` and approves it.
async fn join(h: &Harness, owner: &Account, email: &str, role: Role) -> Account {
    let member = signup(h, email).await;
    let ctx = RequestContext::in_workspace(owner.user.id, owner.workspace.id);
    h.service.invite_member(&ctx, email, Some(role.as_str())).await.unwrap();
    h.service
        .decide_invitation(&ctx, member.user.id, "APPROVE")
        .await
        .unwrap();
    member
}

fn draft(title: &str) -> ExpenseDraft {
    ExpenseDraft {
        title: title.to_string(),
        amount_cents: 1250,
        currency: None,
        occurred_at: Utc::now(),
    }
}

fn note(title: &str, visibility: Visibility) -> NoteDraft {
    NoteDraft {
        title: title.to_string(),
        content: "body".to_string(),
        visibility: Some(visibility.to_string()),
    }
}

fn access_error(err: ServiceError) -> AccessError {
    match err {
        ServiceError::Access(e) => e,
        other => panic!("expected access error, got {other:?}"),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Accounts
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn signup_creates_owner_membership_and_two_audit_entries() {
    let h = harness();
    let account = signup(&h, "owner@acme.io").await;

    assert_eq!(account.workspace.name, DEFAULT_WORKSPACE_NAME);
    let members = h.store.list_members(account.workspace.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].membership.role, Role::Owner);
    assert_eq!(members[0].membership.status, MembershipStatus::Approved);

    let actions: Vec<_> = h.store.audit_entries().unwrap().iter().map(|e| e.action()).collect();
    assert_eq!(actions, vec![AuditAction::WorkspaceCreate, AuditAction::UserSignup]);
    assert_eq!(h.sink.entries().len(), 2);
}

#[tokio::test]
async fn duplicate_email_is_conflict() {
    let h = harness();
    signup(&h, "dup@acme.io").await;
    let err = h
        .service
        .signup(Signup::new("dup@acme.io", "another password", None).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(access_error(err), AccessError::Conflict(_)));
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let h = harness();
    let account = signup(&h, "me@acme.io").await;

    let ok = h.service.login("me@acme.io", "correct horse").await.unwrap();
    assert_eq!(ok.id, account.user.id);

    let wrong_password = access_error(h.service.login("me@acme.io", "nope nope").await.unwrap_err());
    let unknown_email = access_error(h.service.login("ghost@acme.io", "correct horse").await.unwrap_err());
    assert_eq!(wrong_password, AccessError::Unauthenticated);
    assert_eq!(wrong_password, unknown_email);
}

#[tokio::test]
async fn unknown_token_subject_is_unauthenticated() {
    let h = harness();
    let err = h.service.authenticate(UserId::new()).await.unwrap_err();
    assert_eq!(access_error(err), AccessError::Unauthenticated);
}

// ─────────────────────────────────────────────────────────────────────────────
// Context resolution
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_context_pieces_fail_in_order() {
    let h = harness();
    let account = signup(&h, "me@acme.io").await;

    let anonymous = RequestContext::new(None, WorkspaceSelector::Id(account.workspace.id));
    assert_eq!(
        access_error(h.service.list_expenses(&anonymous).await.unwrap_err()),
        AccessError::Unauthenticated
    );

    let no_workspace = RequestContext::authenticated(account.user.id);
    assert_eq!(
        access_error(h.service.list_expenses(&no_workspace).await.unwrap_err()),
        AccessError::NoWorkspace
    );

    let malformed = RequestContext::new(Some(account.user.id), WorkspaceSelector::from_raw(Some("not-a-uuid")));
    assert_eq!(
        access_error(h.service.list_expenses(&malformed).await.unwrap_err()),
        AccessError::workspace_not_found()
    );
}

#[tokio::test]
async fn foreign_workspace_looks_missing() {
    let h = harness();
    let a = signup(&h, "a@acme.io").await;
    let b = signup(&h, "b@acme.io").await;

    let ctx = RequestContext::in_workspace(b.user.id, a.workspace.id);
    let foreign = access_error(h.service.list_notes(&ctx).await.unwrap_err());
    let unknown = access_error(
        h.service
            .list_notes(&RequestContext::in_workspace(b.user.id, WorkspaceId::new()))
            .await
            .unwrap_err(),
    );
    assert_eq!(foreign, AccessError::workspace_not_found());
    assert_eq!(foreign, unknown);
}

// ─────────────────────────────────────────────────────────────────────────────
// Membership lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn viewer_invite_approve_then_reinvite_as_member() {
    let h = harness();
    let owner = signup(&h, "owner@acme.io").await;
    let viewer = signup(&h, "viewer@acme.io").await;
    let owner_ctx = RequestContext::in_workspace(owner.user.id, owner.workspace.id);
    let viewer_ctx = RequestContext::in_workspace(viewer.user.id, owner.workspace.id);

    let invited = h.service.invite_member(&owner_ctx, "viewer@acme.io", Some("VIEWER")).await.unwrap();
    assert_eq!(invited.status, MembershipStatus::Pending);

    // pending members have no access yet
    assert_eq!(
        access_error(h.service.list_expenses(&viewer_ctx).await.unwrap_err()),
        AccessError::workspace_not_found()
    );

    h.service
        .decide_invitation(&owner_ctx, viewer.user.id, "APPROVE")
        .await
        .unwrap();
    assert!(h.service.list_expenses(&viewer_ctx).await.is_ok());
    assert_eq!(
        access_error(h.service.create_expense(&viewer_ctx, draft("Taxi")).await.unwrap_err()),
        AccessError::Forbidden(DenyReason::InsufficientRole { required: Role::Member })
    );

    let reinvited = h.service.invite_member(&owner_ctx, "viewer@acme.io", Some("MEMBER")).await.unwrap();
    assert_eq!(reinvited.id, invited.id);
    assert_eq!(reinvited.role, Role::Member);
    assert_eq!(reinvited.status, MembershipStatus::Pending);

    h.service
        .decide_invitation(&owner_ctx, viewer.user.id, "APPROVE")
        .await
        .unwrap();
    assert!(h.service.create_expense(&viewer_ctx, draft("Taxi")).await.is_ok());
    assert_eq!(h.service.list_members(&owner_ctx).await.unwrap().len(), 2);
}

#[tokio::test]
async fn deciding_a_non_pending_row_is_conflict() {
    let h = harness();
    let owner = signup(&h, "owner@acme.io").await;
    let member = join(&h, &owner, "m@acme.io", Role::Member).await;
    let ctx = RequestContext::in_workspace(owner.user.id, owner.workspace.id);

    let err = h
        .service
        .decide_invitation(&ctx, member.user.id, "REJECT")
        .await
        .unwrap_err();
    assert!(matches!(access_error(err), AccessError::Conflict(_)));
}

#[tokio::test]
async fn inviting_as_owner_is_bad_request_and_admin_cannot_remove_owner() {
    let h = harness();
    let owner = signup(&h, "owner@acme.io").await;
    let admin = join(&h, &owner, "admin@acme.io", Role::Admin).await;
    signup(&h, "someone@acme.io").await;
    let admin_ctx = RequestContext::in_workspace(admin.user.id, owner.workspace.id);

    let err = h.service.invite_member(&admin_ctx, "someone@acme.io", Some("OWNER")).await.unwrap_err();
    assert!(matches!(access_error(err), AccessError::BadRequest(_)));

    let err = h.service.remove_member(&admin_ctx, owner.user.id).await.unwrap_err();
    assert!(matches!(access_error(err), AccessError::Forbidden(_)));

    let err = h.service.invite_member(&admin_ctx, "owner@acme.io", Some("VIEWER")).await.unwrap_err();
    assert!(matches!(access_error(err), AccessError::Forbidden(_) | AccessError::BadRequest(_)));
}

#[tokio::test]
async fn removed_member_is_indistinguishable_from_stranger() {
    let h = harness();
    let owner = signup(&h, "owner@acme.io").await;
    let member = join(&h, &owner, "m@acme.io", Role::Member).await;
    let stranger = signup(&h, "s@acme.io").await;
    let owner_ctx = RequestContext::in_workspace(owner.user.id, owner.workspace.id);

    let removed = h.service.remove_member(&owner_ctx, member.user.id).await.unwrap();
    assert_eq!(removed.state(), MembershipState::Removed);
    assert_eq!(removed.status, MembershipStatus::Rejected);

    let as_removed = h
        .service
        .list_notes(&RequestContext::in_workspace(member.user.id, owner.workspace.id))
        .await
        .unwrap_err();
    let as_stranger = h
        .service
        .list_notes(&RequestContext::in_workspace(stranger.user.id, owner.workspace.id))
        .await
        .unwrap_err();
    assert_eq!(access_error(as_removed), access_error(as_stranger));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_invites_leave_one_row() {
    let h = harness();
    let owner = signup(&h, "owner@acme.io").await;
    signup(&h, "twice@acme.io").await;
    let ctx = RequestContext::in_workspace(owner.user.id, owner.workspace.id);

    let tasks: Vec<_> = ["VIEWER", "MEMBER", "ADMIN", "VIEWER", "MEMBER", "ADMIN", "VIEWER", "MEMBER"]
        .into_iter()
        .map(|role| {
            let service = h.service.clone();
            tokio::spawn(async move { service.invite_member(&ctx, "twice@acme.io", Some(role)).await })
        })
        .collect();

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.unwrap().unwrap().id);
    }
    ids.dedup();
    assert_eq!(ids.len(), 1);

    let members = h.service.list_members(&ctx).await.unwrap();
    assert_eq!(members.len(), 2);
    let invited = members.iter().find(|m| m.email == "twice@acme.io").unwrap();
    assert_eq!(invited.membership.status, MembershipStatus::Pending);
}

#[tokio::test]
async fn stale_membership_transition_is_an_internal_error() {
    let h = harness();
    let owner = signup(&h, "owner@acme.io").await;
    signup(&h, "late@acme.io").await;
    let ctx = RequestContext::in_workspace(owner.user.id, owner.workspace.id);

    let pending = h.service.invite_member(&ctx, "late@acme.io", None).await.unwrap();
    h.service.decide_invitation(&ctx, pending.user_id, "APPROVE").await.unwrap();

    // a second writer still holding the PENDING row loses the race
    let mut rejected = pending.clone();
    rejected.decide(InvitationDecision::Reject, Utc::now()).unwrap();
    let audit = AuditEvent::new(AuditAction::MemberReject, rejected.id, Utc::now());
    let err = h
        .store
        .transition_membership(&rejected, MembershipState::Pending, audit)
        .await
        .unwrap_err();

    let err = ServiceError::from(err);
    assert!(matches!(err, ServiceError::Store(StoreError::ConcurrentWrite(_))));
    assert_eq!(err.code(), ErrorCode::Internal);
    assert_eq!(err.public_message(), "internal server error");
}

#[tokio::test]
async fn member_inputs_are_validated_after_the_role_check() {
    let h = harness();
    let owner = signup(&h, "owner@acme.io").await;
    let member = join(&h, &owner, "m@acme.io", Role::Member).await;
    let pending = signup(&h, "p@acme.io").await;
    let owner_ctx = RequestContext::in_workspace(owner.user.id, owner.workspace.id);
    let member_ctx = RequestContext::in_workspace(member.user.id, owner.workspace.id);

    assert!(matches!(
        access_error(h.service.invite_member(&member_ctx, "p@acme.io", Some("ROOT")).await.unwrap_err()),
        AccessError::Forbidden(_)
    ));
    assert!(matches!(
        access_error(h.service.invite_member(&member_ctx, "foo", None).await.unwrap_err()),
        AccessError::Forbidden(_)
    ));
    assert!(matches!(
        access_error(h.service.invite_member(&owner_ctx, "p@acme.io", Some("ROOT")).await.unwrap_err()),
        AccessError::BadRequest(_)
    ));
    assert!(matches!(
        access_error(h.service.invite_member(&owner_ctx, "foo", None).await.unwrap_err()),
        AccessError::BadRequest(_)
    ));

    let no_workspace = RequestContext::authenticated(owner.user.id);
    assert_eq!(
        access_error(h.service.invite_member(&no_workspace, "p@acme.io", Some("ROOT")).await.unwrap_err()),
        AccessError::NoWorkspace
    );
    assert_eq!(
        access_error(h.service.decide_invitation(&no_workspace, pending.user.id, "MAYBE").await.unwrap_err()),
        AccessError::NoWorkspace
    );

    h.service.invite_member(&owner_ctx, " p@acme.io ", None).await.unwrap();
    assert_eq!(
        access_error(h.service.decide_invitation(&owner_ctx, UserId::new(), "MAYBE").await.unwrap_err()),
        AccessError::NotFound("member")
    );
    assert!(matches!(
        access_error(h.service.decide_invitation(&member_ctx, pending.user.id, "MAYBE").await.unwrap_err()),
        AccessError::Forbidden(_)
    ));
    assert!(matches!(
        access_error(h.service.decide_invitation(&owner_ctx, pending.user.id, "MAYBE").await.unwrap_err()),
        AccessError::BadRequest(_)
    ));
}

#[tokio::test]
async fn viewer_lists_members_but_cannot_invite() {
    let h = harness();
    let owner = signup(&h, "owner@acme.io").await;
    let viewer = join(&h, &owner, "v@acme.io", Role::Viewer).await;
    signup(&h, "x@acme.io").await;
    let ctx = RequestContext::in_workspace(viewer.user.id, owner.workspace.id);

    assert!(matches!(
        access_error(h.service.invite_member(&ctx, "x@acme.io", Some("VIEWER")).await.unwrap_err()),
        AccessError::Forbidden(_)
    ));
    assert_eq!(h.service.list_members(&ctx).await.unwrap().len(), 2);
    assert!(h.service.create_note(&ctx, note("Viewer note", Visibility::Members)).await.is_ok());
}

// ─────────────────────────────────────────────────────────────────────────────
// Expenses
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn expense_ownership_matrix() {
    let h = harness();
    let owner = signup(&h, "owner@acme.io").await;
    let admin = join(&h, &owner, "admin@acme.io", Role::Admin).await;
    let alice = join(&h, &owner, "alice@acme.io", Role::Member).await;
    let bob = join(&h, &owner, "bob@acme.io", Role::Member).await;
    let ws = owner.workspace.id;
    let ctx = |u: &Account| RequestContext::in_workspace(u.user.id, ws);

    let alices = h.service.create_expense(&ctx(&alice), draft("Lunch")).await.unwrap();
    assert_eq!(alices.amount.currency(), "USD");

    let rename = ExpensePatch {
        title: Some("Team lunch".to_string()),
        ..ExpensePatch::default()
    };
    assert_eq!(
        access_error(
            h.service
                .update_expense(&ctx(&bob), alices.id, rename.clone())
                .await
                .unwrap_err()
        ),
        AccessError::Forbidden(DenyReason::NotResourceOwner)
    );
    let updated = h.service.update_expense(&ctx(&alice), alices.id, rename.clone()).await.unwrap();
    assert_eq!(updated.title, "Team lunch");
    assert!(h.service.update_expense(&ctx(&admin), alices.id, rename).await.is_ok());

    h.service.delete_expense(&ctx(&owner), alices.id).await.unwrap();
    assert!(h.service.list_expenses(&ctx(&alice)).await.unwrap().is_empty());
    assert_eq!(
        access_error(h.service.delete_expense(&ctx(&owner), alices.id).await.unwrap_err()),
        AccessError::NotFound("expense")
    );
    assert_eq!(
        access_error(h.service.delete_expense(&ctx(&owner), ExpenseId::new()).await.unwrap_err()),
        AccessError::NotFound("expense")
    );
}

#[tokio::test]
async fn authorization_precedes_validation() {
    let h = harness();
    let owner = signup(&h, "owner@acme.io").await;
    let viewer = join(&h, &owner, "v@acme.io", Role::Viewer).await;
    let invalid = ExpenseDraft {
        amount_cents: -5,
        ..draft("")
    };

    let as_viewer = RequestContext::in_workspace(viewer.user.id, owner.workspace.id);
    assert!(matches!(
        access_error(h.service.create_expense(&as_viewer, invalid.clone()).await.unwrap_err()),
        AccessError::Forbidden(_)
    ));

    let as_owner = RequestContext::in_workspace(owner.user.id, owner.workspace.id);
    assert!(matches!(
        access_error(h.service.create_expense(&as_owner, invalid).await.unwrap_err()),
        AccessError::BadRequest(_)
    ));
}

#[tokio::test]
async fn denied_mutation_writes_no_audit_entry() {
    let h = harness();
    let owner = signup(&h, "owner@acme.io").await;
    let viewer = join(&h, &owner, "v@acme.io", Role::Viewer).await;
    let before = h.store.audit_entries().unwrap().len();

    let ctx = RequestContext::in_workspace(viewer.user.id, owner.workspace.id);
    assert!(h.service.create_expense(&ctx, draft("Nope")).await.is_err());
    let owner_ctx = RequestContext::in_workspace(owner.user.id, owner.workspace.id);
    let others = h.service.create_expense(&owner_ctx, draft("Owner's")).await.unwrap();
    let before = before + 1;
    assert!(h.service.delete_expense(&ctx, others.id).await.is_err());

    assert_eq!(h.store.audit_entries().unwrap().len(), before);
    assert_eq!(h.sink.entries().len(), before);
}

// ─────────────────────────────────────────────────────────────────────────────
// Notes
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn private_notes_are_hidden_even_from_the_owner() {
    let h = harness();
    let owner = signup(&h, "owner@acme.io").await;
    let member = join(&h, &owner, "m@acme.io", Role::Member).await;
    let ws = owner.workspace.id;
    let owner_ctx = RequestContext::in_workspace(owner.user.id, ws);
    let member_ctx = RequestContext::in_workspace(member.user.id, ws);

    let secret = h.service.create_note(&member_ctx, note("Diary", Visibility::Private)).await.unwrap();
    let shared = h.service.create_note(&member_ctx, note("Plan", Visibility::Members)).await.unwrap();

    let listed: Vec<_> = h.service.list_notes(&owner_ctx).await.unwrap().into_iter().map(|n| n.id).collect();
    assert_eq!(listed, vec![shared.id]);
    assert!(matches!(
        access_error(h.service.get_note(&owner_ctx, secret.id).await.unwrap_err()),
        AccessError::Forbidden(_)
    ));
    assert_eq!(h.service.get_note(&member_ctx, secret.id).await.unwrap().title, "Diary");

    let edit = NoteEdit {
        title: Some("Mine now".to_string()),
        ..NoteEdit::default()
    };
    assert_eq!(
        access_error(h.service.update_note(&owner_ctx, shared.id, edit.clone()).await.unwrap_err()),
        AccessError::Forbidden(DenyReason::NotResourceOwner)
    );
    assert_eq!(h.service.update_note(&member_ctx, shared.id, edit).await.unwrap().title, "Mine now");

    assert_eq!(
        access_error(h.service.delete_note(&owner_ctx, shared.id).await.unwrap_err()),
        AccessError::Forbidden(DenyReason::NotResourceOwner)
    );
    h.service.delete_note(&member_ctx, shared.id).await.unwrap();
    assert_eq!(
        access_error(h.service.get_note(&member_ctx, shared.id).await.unwrap_err()),
        AccessError::NotFound("note")
    );
}

#[tokio::test]
async fn public_notes_are_readable_anonymously_until_the_workspace_is_deleted() {
    let h = harness();
    let owner = signup(&h, "owner@acme.io").await;
    let ctx = RequestContext::in_workspace(owner.user.id, owner.workspace.id);

    let public = h.service.create_note(&ctx, note("Hello", Visibility::Public)).await.unwrap();
    let private = h.service.create_note(&ctx, note("Secret", Visibility::Private)).await.unwrap();

    assert_eq!(h.service.public_note(public.id).await.unwrap().title, "Hello");
    assert_eq!(
        access_error(h.service.public_note(private.id).await.unwrap_err()),
        AccessError::NotFound("note")
    );

    h.service.delete_workspace(&ctx, owner.workspace.id).await.unwrap();
    assert_eq!(
        access_error(h.service.public_note(public.id).await.unwrap_err()),
        AccessError::NotFound("note")
    );
}

#[tokio::test]
async fn note_update_audit_carries_changed_fields() {
    let h = harness();
    let owner = signup(&h, "owner@acme.io").await;
    let ctx = RequestContext::in_workspace(owner.user.id, owner.workspace.id);
    let created = h.service.create_note(&ctx, note("Draft", Visibility::Private)).await.unwrap();

    let edit = NoteEdit {
        visibility: Some("public".to_string()),
        ..NoteEdit::default()
    };
    h.service.update_note(&ctx, created.id, edit).await.unwrap();

    let last = h.sink.entries().pop().unwrap();
    assert_eq!(last.action(), AuditAction::NoteUpdate);
    assert_eq!(last.event.meta, Some(serde_json::json!({ "visibility": "PUBLIC" })));
}

// ─────────────────────────────────────────────────────────────────────────────
// Workspaces
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn only_the_owner_deletes_and_deleted_workspaces_vanish() {
    let h = harness();
    let owner = signup(&h, "owner@acme.io").await;
    let admin = join(&h, &owner, "admin@acme.io", Role::Admin).await;
    let ws = owner.workspace.id;

    let err = h
        .service
        .delete_workspace(&RequestContext::authenticated(admin.user.id), ws)
        .await
        .unwrap_err();
    assert!(matches!(access_error(err), AccessError::Forbidden(_)));

    let deleted = h
        .service
        .delete_workspace(&RequestContext::authenticated(owner.user.id), ws)
        .await
        .unwrap();
    assert!(deleted.is_deleted());

    let listed = h
        .service
        .list_workspaces(&RequestContext::authenticated(admin.user.id))
        .await
        .unwrap();
    assert!(listed.iter().all(|w| w.id != ws));
    assert_eq!(
        access_error(h.service.switch_workspace(&RequestContext::in_workspace(owner.user.id, ws)).await.unwrap_err()),
        AccessError::workspace_not_found()
    );
    assert_eq!(
        access_error(
            h.service
                .delete_workspace(&RequestContext::authenticated(owner.user.id), ws)
                .await
                .unwrap_err()
        ),
        AccessError::workspace_not_found()
    );
}

#[tokio::test]
async fn created_workspace_is_listed_and_switchable() {
    let h = harness();
    let owner = signup(&h, "owner@acme.io").await;
    let ctx = RequestContext::authenticated(owner.user.id);

    let second = h.service.create_workspace(&ctx, "Side project").await.unwrap();
    let listed = h.service.list_workspaces(&ctx).await.unwrap();
    assert_eq!(listed.len(), 2);

    let switched = h
        .service
        .switch_workspace(&RequestContext::in_workspace(owner.user.id, second.id))
        .await
        .unwrap();
    assert_eq!(switched.name, "Side project");
    assert_eq!(switched.role, Role::Owner);
}
