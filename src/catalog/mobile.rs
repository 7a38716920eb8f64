//! 移动端，学生与讲师共用。过程按 assign_type 区分身份

use super::*;
use super::ArgKind::*;
use crate::models::auth::AssignType;

const ACCOUNT: ArgSpec = user(UserField::UserId);
const KIND: ArgSpec = user(UserField::AssignType);

pub const PORTAL: Portal = Portal {
    name: "mobile-app",
    roles: &[AssignType::Student, AssignType::Lecturer],
    resources: &[
        Resource {
            path: "/attendance",
            subject: "Attendance",
            endpoints: &[
                // 扫描讲师开启的签到二维码
                Endpoint::new(
                    HttpMethod::Post,
                    "/scan",
                    Action::Scan,
                    "sp_mobile_attendance_scan",
                    &[
                        ACCOUNT,
                        KIND,
                        body("qr_token", Text),
                        body("latitude", Decimal).optional(),
                        body("longitude", Decimal).optional(),
                        body("device_id", Text).optional(),
                    ],
                ),
                list(
                    "sp_mobile_attendance_history",
                    &[ACCOUNT, KIND, query("class_id", Int), PAGE, PAGE_SIZE],
                ),
                Endpoint::new(
                    HttpMethod::Get,
                    "/summary",
                    Action::Report,
                    "sp_mobile_attendance_summary",
                    &[ACCOUNT, KIND],
                ),
            ],
        },
        Resource {
            path: "/schedules",
            subject: "Schedule",
            endpoints: &[Endpoint::new(
                HttpMethod::Get,
                "/today",
                Action::Rows,
                "sp_mobile_schedule_today",
                &[ACCOUNT, KIND],
            )],
        },
        Resource {
            path: "/profile",
            subject: "Profile",
            endpoints: &[Endpoint::new(
                HttpMethod::Get,
                "",
                Action::Get,
                "sp_mobile_profile_get",
                &[ACCOUNT, KIND],
            )],
        },
        Resource {
            path: "/leave-requests",
            subject: "Leave request",
            endpoints: &[
                list(
                    "sp_mobile_leave_list",
                    &[ACCOUNT, KIND, query("status", Text), PAGE, PAGE_SIZE],
                ),
                formload("sp_leave_type_formload", &[]),
                Endpoint::new(
                    HttpMethod::Post,
                    "",
                    Action::Submit,
                    "sp_mobile_leave_submit",
                    &[
                        ACCOUNT,
                        KIND,
                        body("class_id", Int).optional(),
                        body("leave_type", Text),
                        body("start_date", Date),
                        body("end_date", Date),
                        body("reason", Text),
                    ],
                ),
            ],
        },
    ],
};
