//! 讲师门户。所有过程的第一个参数是当前讲师 ID（assign_to），
//! 归属校验在过程内完成

use super::*;
use super::ArgKind::*;
use crate::models::auth::AssignType;

const LECTURER: ArgSpec = user(UserField::AssignTo);

const DATE_FROM: ArgSpec = query("date_from", Date);
const DATE_TO: ArgSpec = query("date_to", Date);

pub const PORTAL: Portal = Portal {
    name: "lecturer-portal",
    roles: &[AssignType::Lecturer],
    resources: &[
        Resource {
            path: "/profile",
            subject: "Lecturer profile",
            endpoints: &[
                Endpoint::new(
                    HttpMethod::Get,
                    "",
                    Action::Get,
                    "sp_lecturer_profile_get",
                    &[LECTURER],
                ),
                Endpoint::new(
                    HttpMethod::Put,
                    "",
                    Action::Update,
                    "sp_lecturer_profile_update",
                    &[
                        LECTURER,
                        body("phone", Text).optional(),
                        body("email", Text).optional(),
                    ],
                ),
            ],
        },
        Resource {
            path: "/schedules",
            subject: "Schedule",
            endpoints: &[
                Endpoint::new(
                    HttpMethod::Get,
                    "/today",
                    Action::Rows,
                    "sp_lecturer_schedule_today",
                    &[LECTURER],
                ),
                Endpoint::new(
                    HttpMethod::Get,
                    "/week",
                    Action::Rows,
                    "sp_lecturer_schedule_week",
                    &[LECTURER, query("week_start", Date)],
                ),
            ],
        },
        Resource {
            path: "/classes",
            subject: "Class",
            endpoints: &[
                list(
                    "sp_lecturer_class_list",
                    &[
                        LECTURER,
                        query("academic_year", Text),
                        query("semester", Int),
                        SEARCH,
                        PAGE,
                        PAGE_SIZE,
                    ],
                ),
                formload("sp_lecturer_class_formload", &[LECTURER]),
                get_by_id("sp_lecturer_class_get", &[LECTURER, ID]),
                Endpoint::new(
                    HttpMethod::Get,
                    "/{id}/students",
                    Action::Rows,
                    "sp_lecturer_class_students",
                    &[LECTURER, ID],
                ),
            ],
        },
        Resource {
            path: "/attendance-sessions",
            subject: "Attendance session",
            endpoints: &[
                list(
                    "sp_attendance_session_list",
                    &[
                        LECTURER,
                        query("class_id", Int),
                        query("session_date", Date),
                        PAGE,
                        PAGE_SIZE,
                    ],
                ),
                // 过程生成本次签到的二维码令牌
                Endpoint::new(
                    HttpMethod::Post,
                    "",
                    Action::Create,
                    "sp_attendance_session_open",
                    &[
                        LECTURER,
                        body("schedule_id", Int),
                        body("session_date", Date),
                        body("duration_minutes", Int).optional(),
                        body("latitude", Decimal).optional(),
                        body("longitude", Decimal).optional(),
                        body("radius_meters", Int).optional(),
                    ],
                ),
                get_by_id("sp_attendance_session_get", &[LECTURER, ID]),
                Endpoint::new(
                    HttpMethod::Get,
                    "/{id}/records",
                    Action::Rows,
                    "sp_attendance_session_records",
                    &[LECTURER, ID],
                ),
                Endpoint::new(
                    HttpMethod::Put,
                    "/{id}/records/{student_id}",
                    Action::Update,
                    "sp_attendance_mark_manual",
                    &[
                        LECTURER,
                        ID,
                        path("student_id", Int),
                        body("status", Text),
                        body("remark", Text).optional(),
                    ],
                ),
                Endpoint::new(
                    HttpMethod::Put,
                    "/{id}/refresh-code",
                    Action::Update,
                    "sp_attendance_session_refresh_code",
                    &[LECTURER, ID],
                ),
                Endpoint::new(
                    HttpMethod::Put,
                    "/{id}/close",
                    Action::Update,
                    "sp_attendance_session_close",
                    &[LECTURER, ID],
                ),
            ],
        },
        Resource {
            path: "/leave-requests",
            subject: "Leave request",
            endpoints: &[
                list(
                    "sp_lecturer_leave_list",
                    &[LECTURER, query("status", Text), PAGE, PAGE_SIZE],
                ),
                formload("sp_leave_type_formload", &[]),
                Endpoint::new(
                    HttpMethod::Post,
                    "",
                    Action::Submit,
                    "sp_lecturer_leave_submit",
                    &[
                        LECTURER,
                        body("leave_type", Text),
                        body("start_date", Date),
                        body("end_date", Date),
                        body("reason", Text),
                        body("attachment_url", Text).optional(),
                    ],
                ),
                get_by_id("sp_lecturer_leave_get", &[LECTURER, ID]),
                delete("sp_lecturer_leave_cancel", &[LECTURER, ID]),
            ],
        },
        Resource {
            path: "/student-leaves",
            subject: "Student leave request",
            endpoints: &[
                list(
                    "sp_lecturer_student_leave_list",
                    &[
                        LECTURER,
                        query("class_id", Int),
                        query("status", Text),
                        PAGE,
                        PAGE_SIZE,
                    ],
                ),
                get_by_id("sp_lecturer_student_leave_get", &[LECTURER, ID]),
                Endpoint::new(
                    HttpMethod::Put,
                    "/{id}/review",
                    Action::Review,
                    "sp_lecturer_student_leave_review",
                    &[
                        LECTURER,
                        ID,
                        body("status", Text),
                        body("remark", Text).optional(),
                    ],
                ),
            ],
        },
        Resource {
            path: "/reports",
            subject: "Attendance",
            endpoints: &[
                Endpoint::new(
                    HttpMethod::Get,
                    "/dashboard",
                    Action::Report,
                    "sp_lecturer_report_dashboard",
                    &[LECTURER],
                ),
                Endpoint::new(
                    HttpMethod::Get,
                    "/class-attendance",
                    Action::Report,
                    "sp_lecturer_report_class_attendance",
                    &[LECTURER, query("class_id", Int).required(), DATE_FROM, DATE_TO],
                ),
                Endpoint::new(
                    HttpMethod::Get,
                    "/student-attendance",
                    Action::Report,
                    "sp_lecturer_report_student_attendance",
                    &[
                        LECTURER,
                        query("class_id", Int).required(),
                        query("student_id", Int).required(),
                    ],
                ),
            ],
        },
    ],
};
