use axum::Json;
use serde::Serialize;

/// The signed-in user shown in the dashboard header. There is no account
/// system behind it.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(super) struct UserProfile {
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub email: &'static str,
    pub id: u32,
}

pub(super) const DEMO_USER: UserProfile = UserProfile {
    first_name: "Jane",
    last_name: "Doe",
    email: "janedoe@email.com",
    id: 1,
};

pub(super) async fn get_user() -> Json<UserProfile> {
    Json(DEMO_USER)
}
