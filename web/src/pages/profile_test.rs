use olahub::types::UserIdentity;

use super::*;

fn profile(username: &str) -> UserProfile {
    serde_json::from_value(serde_json::json!({ "username": username, "followers": 4, "isFollowing": false }))
        .unwrap()
}

fn signed_in(username: &str) -> AuthState {
    AuthState {
        user: Some(UserIdentity {
            id: "1".to_owned(),
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            avatar: None,
        }),
        loading: false,
        busy: false,
    }
}

#[test]
fn follow_toggle_adjusts_followers() {
    let start = FollowState::from_profile(&profile("bob"));
    assert_eq!(start, FollowState { following: false, followers: 4 });
    assert_eq!(start.button_label(), "Follow");

    let followed = start.toggled();
    assert_eq!(followed, FollowState { following: true, followers: 5 });
    assert_eq!(followed.button_label(), "Unfollow");
    assert_eq!(followed.toggled(), start);
}

#[test]
fn unfollow_never_underflows() {
    let odd = FollowState { following: true, followers: 0 };
    assert_eq!(odd.toggled().followers, 0);
}

#[test]
fn follow_hidden_on_own_profile() {
    let auth = signed_in("alice");
    assert!(!can_follow(&profile("alice"), &auth));
    assert!(can_follow(&profile("bob"), &auth));

    let mut flagged = profile("bob");
    flagged.is_current_user = true;
    assert!(!can_follow(&flagged, &auth));
}

#[test]
fn follow_hidden_when_anonymous() {
    let anonymous = AuthState { user: None, loading: false, busy: false };
    assert!(!can_follow(&profile("bob"), &anonymous));
}
