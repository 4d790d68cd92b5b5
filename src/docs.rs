use crate::api::leave_request::DeleteForm;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use crate::utils::validation::LeaveForm;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LeaveTrack-Pro",
        version = "1.0.0",
        description = r#"
## Leave Management

Server-rendered pages for submitting and reviewing employee leave requests.

### Key Features
- **Leave requests**
  - Apply for leave, list, view, edit and delete requests
  - Approve or reject by changing the status on the edit form
- **Health**
  - Liveness check for container orchestration

### Forms
- Mutating routes accept `application/x-www-form-urlencoded` bodies
- Every POST must carry the session's `csrf_token`
- Successful mutations answer `303 See Other` back to the list

---
Built with **Rust**, **Actix Web**, **SQLx** and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave_request::leave_list,
        crate::api::leave_request::add_form,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::view_leave,
        crate::api::leave_request::edit_form,
        crate::api::leave_request::update_leave,
        crate::api::leave_request::delete_leave,

        crate::api::health::health
    ),
    components(
        schemas(
            LeaveForm,
            DeleteForm,
            LeaveRequest,
            LeaveType,
            LeaveStatus
        )
    ),
    tags(
        (name = "Leave", description = "Leave request pages"),
        (name = "Health", description = "Liveness check"),
    )
)]
pub struct ApiDoc;
