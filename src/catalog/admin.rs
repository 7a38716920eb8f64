//! 管理员门户：基础数据、账号、角色权限和全校报表

use super::*;
use crate::models::auth::AssignType;
use super::ArgKind::*;

const ACTOR: ArgSpec = user(UserField::UserId);

const DATE_FROM: ArgSpec = query("date_from", Date);
const DATE_TO: ArgSpec = query("date_to", Date);

pub const PORTAL: Portal = Portal {
    name: "admin-portal",
    roles: &[AssignType::Admin],
    resources: &[
        Resource {
            path: "/faculties",
            subject: "Faculty",
            endpoints: &[
                list("sp_faculty_list", &[SEARCH, PAGE, PAGE_SIZE]),
                search("sp_faculty_search", &[query("keyword", Text).required()]),
                formload("sp_faculty_formload", &[]),
                create(
                    "sp_faculty_create",
                    &[
                        body("faculty_code", Text),
                        body("faculty_name", Text),
                        body("description", Text).optional(),
                        ACTOR,
                    ],
                ),
                get_by_id("sp_faculty_get", &[ID]),
                update(
                    "sp_faculty_update",
                    &[
                        ID,
                        body("faculty_code", Text),
                        body("faculty_name", Text),
                        body("description", Text).optional(),
                        ACTOR,
                    ],
                ),
                delete("sp_faculty_delete", &[ID, ACTOR]),
            ],
        },
        Resource {
            path: "/fields",
            subject: "Field",
            endpoints: &[
                list(
                    "sp_field_list",
                    &[query("faculty_id", Int), SEARCH, PAGE, PAGE_SIZE],
                ),
                search("sp_field_search", &[query("keyword", Text).required()]),
                formload("sp_field_formload", &[query("faculty_id", Int)]),
                create(
                    "sp_field_create",
                    &[
                        body("faculty_id", Int),
                        body("field_code", Text),
                        body("field_name", Text),
                        body("description", Text).optional(),
                        ACTOR,
                    ],
                ),
                get_by_id("sp_field_get", &[ID]),
                update(
                    "sp_field_update",
                    &[
                        ID,
                        body("faculty_id", Int),
                        body("field_code", Text),
                        body("field_name", Text),
                        body("description", Text).optional(),
                        ACTOR,
                    ],
                ),
                delete("sp_field_delete", &[ID, ACTOR]),
            ],
        },
        Resource {
            path: "/courses",
            subject: "Course",
            endpoints: &[
                list(
                    "sp_course_list",
                    &[query("field_id", Int), SEARCH, PAGE, PAGE_SIZE],
                ),
                search("sp_course_search", &[query("keyword", Text).required()]),
                filter(
                    "sp_course_filter",
                    &[
                        body("faculty_id", Int).optional(),
                        body("field_id", Int).optional(),
                        body("credits", Int).optional(),
                    ],
                ),
                formload("sp_course_formload", &[query("field_id", Int)]),
                create(
                    "sp_course_create",
                    &[
                        body("field_id", Int),
                        body("course_code", Text),
                        body("course_name", Text),
                        body("credits", Int),
                        body("description", Text).optional(),
                        ACTOR,
                    ],
                ),
                get_by_id("sp_course_get", &[ID]),
                update(
                    "sp_course_update",
                    &[
                        ID,
                        body("field_id", Int),
                        body("course_code", Text),
                        body("course_name", Text),
                        body("credits", Int),
                        body("description", Text).optional(),
                        ACTOR,
                    ],
                ),
                delete("sp_course_delete", &[ID, ACTOR]),
            ],
        },
        Resource {
            path: "/lecturers",
            subject: "Lecturer",
            endpoints: &[
                list(
                    "sp_lecturer_list",
                    &[query("faculty_id", Int), SEARCH, PAGE, PAGE_SIZE],
                ),
                search("sp_lecturer_search", &[query("keyword", Text).required()]),
                filter(
                    "sp_lecturer_filter",
                    &[
                        body("faculty_id", Int).optional(),
                        body("field_id", Int).optional(),
                        body("status", Text).optional(),
                    ],
                ),
                formload("sp_lecturer_formload", &[query("faculty_id", Int)]),
                // 同时创建登录账号
                create(
                    "sp_lecturer_create",
                    &[
                        body("lecturer_code", Text),
                        body("title", Text).optional(),
                        body("first_name", Text),
                        body("last_name", Text),
                        body("email", Text),
                        body("phone", Text).optional(),
                        body("faculty_id", Int),
                        body("username", Text),
                        body("password", Password),
                        ACTOR,
                    ],
                ),
                get_by_id("sp_lecturer_get", &[ID]),
                update(
                    "sp_lecturer_update",
                    &[
                        ID,
                        body("lecturer_code", Text),
                        body("title", Text).optional(),
                        body("first_name", Text),
                        body("last_name", Text),
                        body("email", Text),
                        body("phone", Text).optional(),
                        body("faculty_id", Int),
                        body("status", Text).optional(),
                        ACTOR,
                    ],
                ),
                delete("sp_lecturer_delete", &[ID, ACTOR]),
                Endpoint::new(
                    HttpMethod::Get,
                    "/{id}/classes",
                    Action::Rows,
                    "sp_lecturer_class_rows",
                    &[ID],
                ),
            ],
        },
        Resource {
            path: "/students",
            subject: "Student",
            endpoints: &[
                list(
                    "sp_student_list",
                    &[
                        query("field_id", Int),
                        query("year_level", Int),
                        SEARCH,
                        PAGE,
                        PAGE_SIZE,
                    ],
                ),
                search("sp_student_search", &[query("keyword", Text).required()]),
                filter(
                    "sp_student_filter",
                    &[
                        body("faculty_id", Int).optional(),
                        body("field_id", Int).optional(),
                        body("year_level", Int).optional(),
                        body("status", Text).optional(),
                    ],
                ),
                formload("sp_student_formload", &[query("class_id", Int)]),
                create(
                    "sp_student_create",
                    &[
                        body("student_code", Text),
                        body("first_name", Text),
                        body("last_name", Text),
                        body("email", Text),
                        body("phone", Text).optional(),
                        body("field_id", Int),
                        body("year_level", Int),
                        body("username", Text),
                        body("password", Password),
                        ACTOR,
                    ],
                ),
                get_by_id("sp_student_get", &[ID]),
                update(
                    "sp_student_update",
                    &[
                        ID,
                        body("student_code", Text),
                        body("first_name", Text),
                        body("last_name", Text),
                        body("email", Text),
                        body("phone", Text).optional(),
                        body("field_id", Int),
                        body("year_level", Int),
                        body("status", Text).optional(),
                        ACTOR,
                    ],
                ),
                delete("sp_student_delete", &[ID, ACTOR]),
            ],
        },
        Resource {
            path: "/classes",
            subject: "Class",
            endpoints: &[
                list(
                    "sp_class_list",
                    &[
                        query("course_id", Int),
                        query("academic_year", Text),
                        query("semester", Int),
                        SEARCH,
                        PAGE,
                        PAGE_SIZE,
                    ],
                ),
                search("sp_class_search", &[query("keyword", Text).required()]),
                formload("sp_class_formload", &[query("course_id", Int)]),
                create(
                    "sp_class_create",
                    &[
                        body("course_id", Int),
                        body("lecturer_id", Int),
                        body("section", Text),
                        body("academic_year", Text),
                        body("semester", Int),
                        body("capacity", Int).optional(),
                        ACTOR,
                    ],
                ),
                get_by_id("sp_class_get", &[ID]),
                update(
                    "sp_class_update",
                    &[
                        ID,
                        body("course_id", Int),
                        body("lecturer_id", Int),
                        body("section", Text),
                        body("academic_year", Text),
                        body("semester", Int),
                        body("capacity", Int).optional(),
                        ACTOR,
                    ],
                ),
                delete("sp_class_delete", &[ID, ACTOR]),
                Endpoint::new(
                    HttpMethod::Get,
                    "/{id}/students",
                    Action::Rows,
                    "sp_class_student_rows",
                    &[ID],
                ),
                // student_ids 为 JSON 数组，批量加入
                Endpoint::new(
                    HttpMethod::Post,
                    "/{id}/students",
                    Action::Create,
                    "sp_class_enroll_students",
                    &[ID, body("student_ids", Json), ACTOR],
                ),
                Endpoint::new(
                    HttpMethod::Delete,
                    "/{id}/students/{student_id}",
                    Action::Delete,
                    "sp_class_remove_student",
                    &[ID, path("student_id", Int), ACTOR],
                ),
            ],
        },
        Resource {
            path: "/schedules",
            subject: "Schedule",
            endpoints: &[
                list(
                    "sp_schedule_list",
                    &[
                        query("class_id", Int),
                        query("day_of_week", Int),
                        PAGE,
                        PAGE_SIZE,
                    ],
                ),
                formload("sp_schedule_formload", &[]),
                create(
                    "sp_schedule_create",
                    &[
                        body("class_id", Int),
                        body("day_of_week", Int),
                        body("start_time", Time),
                        body("end_time", Time),
                        body("room", Text),
                        body("late_after_minutes", Int).optional(),
                        ACTOR,
                    ],
                ),
                get_by_id("sp_schedule_get", &[ID]),
                update(
                    "sp_schedule_update",
                    &[
                        ID,
                        body("class_id", Int),
                        body("day_of_week", Int),
                        body("start_time", Time),
                        body("end_time", Time),
                        body("room", Text),
                        body("late_after_minutes", Int).optional(),
                        ACTOR,
                    ],
                ),
                delete("sp_schedule_delete", &[ID, ACTOR]),
            ],
        },
        Resource {
            path: "/student-leaves",
            subject: "Student leave request",
            endpoints: &[
                list(
                    "sp_admin_student_leave_list",
                    &[
                        query("status", Text),
                        DATE_FROM,
                        DATE_TO,
                        SEARCH,
                        PAGE,
                        PAGE_SIZE,
                    ],
                ),
                get_by_id("sp_admin_student_leave_get", &[ID]),
                Endpoint::new(
                    HttpMethod::Put,
                    "/{id}/review",
                    Action::Review,
                    "sp_admin_student_leave_review",
                    &[ID, body("status", Text), body("remark", Text).optional(), ACTOR],
                ),
            ],
        },
        Resource {
            path: "/lecturer-leaves",
            subject: "Lecturer leave request",
            endpoints: &[
                list(
                    "sp_admin_lecturer_leave_list",
                    &[
                        query("status", Text),
                        DATE_FROM,
                        DATE_TO,
                        SEARCH,
                        PAGE,
                        PAGE_SIZE,
                    ],
                ),
                get_by_id("sp_admin_lecturer_leave_get", &[ID]),
                Endpoint::new(
                    HttpMethod::Put,
                    "/{id}/review",
                    Action::Review,
                    "sp_admin_lecturer_leave_review",
                    &[ID, body("status", Text), body("remark", Text).optional(), ACTOR],
                ),
            ],
        },
        Resource {
            path: "/roles",
            subject: "Role",
            endpoints: &[
                list("sp_role_list", &[SEARCH, PAGE, PAGE_SIZE]),
                formload("sp_role_formload", &[]),
                Endpoint::new(
                    HttpMethod::Get,
                    "/permissions",
                    Action::Rows,
                    "sp_permission_rows",
                    &[],
                ),
                create(
                    "sp_role_create",
                    &[
                        body("role_name", Text),
                        body("description", Text).optional(),
                        ACTOR,
                    ],
                ),
                get_by_id("sp_role_get", &[ID]),
                update(
                    "sp_role_update",
                    &[
                        ID,
                        body("role_name", Text),
                        body("description", Text).optional(),
                        ACTOR,
                    ],
                ),
                delete("sp_role_delete", &[ID, ACTOR]),
                Endpoint::new(
                    HttpMethod::Get,
                    "/{id}/permissions",
                    Action::Rows,
                    "sp_role_permission_rows",
                    &[ID],
                ),
                Endpoint::new(
                    HttpMethod::Patch,
                    "/{id}/permissions/{permission_id}",
                    Action::Toggle,
                    "sp_role_permission_toggle",
                    &[ID, path("permission_id", Int), body("is_granted", Bool), ACTOR],
                ),
            ],
        },
        Resource {
            path: "/users",
            subject: "User",
            endpoints: &[
                list(
                    "sp_user_list",
                    &[
                        query("assign_type", Text),
                        query("is_active", Bool),
                        SEARCH,
                        PAGE,
                        PAGE_SIZE,
                    ],
                ),
                create(
                    "sp_user_create",
                    &[
                        body("username", Text),
                        body("email", Text),
                        body("password", Password),
                        body("assign_type", Text),
                        body("assign_to", Int).optional(),
                        body("role_id", Int).optional(),
                        ACTOR,
                    ],
                ),
                get_by_id("sp_user_get", &[ID]),
                update(
                    "sp_user_update",
                    &[
                        ID,
                        body("email", Text),
                        body("assign_type", Text),
                        body("assign_to", Int).optional(),
                        body("role_id", Int).optional(),
                        ACTOR,
                    ],
                ),
                delete("sp_user_delete", &[ID, ACTOR]),
                Endpoint::new(
                    HttpMethod::Put,
                    "/{id}/password",
                    Action::Update,
                    "sp_user_reset_password",
                    &[ID, body("password", Password), ACTOR],
                ),
                Endpoint::new(
                    HttpMethod::Patch,
                    "/{id}/status",
                    Action::Toggle,
                    "sp_user_toggle_status",
                    &[ID, body("is_active", Bool), ACTOR],
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
                    "sp_report_admin_dashboard",
                    &[],
                ),
                Endpoint::new(
                    HttpMethod::Get,
                    "/attendance-summary",
                    Action::Report,
                    "sp_report_attendance_summary",
                    &[
                        query("faculty_id", Int),
                        query("field_id", Int),
                        DATE_FROM,
                        DATE_TO,
                    ],
                ),
                Endpoint::new(
                    HttpMethod::Get,
                    "/class-attendance",
                    Action::Report,
                    "sp_report_class_attendance",
                    &[query("class_id", Int).required(), DATE_FROM, DATE_TO],
                ),
                Endpoint::new(
                    HttpMethod::Get,
                    "/student-attendance",
                    Action::Report,
                    "sp_report_student_attendance",
                    &[query("student_id", Int).required(), DATE_FROM, DATE_TO],
                ),
                Endpoint::new(
                    HttpMethod::Get,
                    "/leave-summary",
                    Action::Report,
                    "sp_report_leave_summary",
                    &[query("assign_type", Text), DATE_FROM, DATE_TO],
                ),
            ],
        },
    ],
};
