//! 学生门户，参数中的学生 ID 一律取自当前账号

use super::*;
use super::ArgKind::*;
use crate::models::auth::AssignType;

const STUDENT: ArgSpec = user(UserField::AssignTo);

pub const PORTAL: Portal = Portal {
    name: "student-portal",
    roles: &[AssignType::Student],
    resources: &[
        Resource {
            path: "/profile",
            subject: "Student profile",
            endpoints: &[
                Endpoint::new(
                    HttpMethod::Get,
                    "",
                    Action::Get,
                    "sp_student_profile_get",
                    &[STUDENT],
                ),
                Endpoint::new(
                    HttpMethod::Put,
                    "",
                    Action::Update,
                    "sp_student_profile_update",
                    &[
                        STUDENT,
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
                    "sp_student_schedule_today",
                    &[STUDENT],
                ),
                Endpoint::new(
                    HttpMethod::Get,
                    "/week",
                    Action::Rows,
                    "sp_student_schedule_week",
                    &[STUDENT, query("week_start", Date)],
                ),
            ],
        },
        Resource {
            path: "/classes",
            subject: "Class",
            endpoints: &[
                Endpoint::new(
                    HttpMethod::Get,
                    "/enrolled",
                    Action::Rows,
                    "sp_student_class_rows",
                    &[STUDENT, query("academic_year", Text), query("semester", Int)],
                ),
                formload("sp_student_class_formload", &[STUDENT]),
            ],
        },
        Resource {
            path: "/attendance",
            subject: "Attendance",
            endpoints: &[
                list(
                    "sp_student_attendance_list",
                    &[
                        STUDENT,
                        query("class_id", Int),
                        query("date_from", Date),
                        query("date_to", Date),
                        PAGE,
                        PAGE_SIZE,
                    ],
                ),
                Endpoint::new(
                    HttpMethod::Get,
                    "/summary",
                    Action::Report,
                    "sp_student_attendance_summary",
                    &[STUDENT, query("class_id", Int)],
                ),
            ],
        },
        Resource {
            path: "/leave-requests",
            subject: "Leave request",
            endpoints: &[
                list(
                    "sp_student_leave_list",
                    &[STUDENT, query("status", Text), PAGE, PAGE_SIZE],
                ),
                formload("sp_leave_type_formload", &[]),
                Endpoint::new(
                    HttpMethod::Post,
                    "",
                    Action::Submit,
                    "sp_student_leave_submit",
                    &[
                        STUDENT,
                        body("class_id", Int).optional(),
                        body("leave_type", Text),
                        body("start_date", Date),
                        body("end_date", Date),
                        body("reason", Text),
                        body("attachment_url", Text).optional(),
                    ],
                ),
                get_by_id("sp_student_leave_get", &[STUDENT, ID]),
                delete("sp_student_leave_cancel", &[STUDENT, ID]),
            ],
        },
    ],
};
