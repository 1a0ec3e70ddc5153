use super::{ErrorCode, FieldErrors, Fields};
use crate::kinds::{EntityKind, FormMode};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sex {
    Male,
    Female,
}

pub const SEX_CHOICES: [&str; 2] = ["MALE", "FEMALE"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

pub const DAY_CHOICES: [&str; 5] = ["MONDAY", "TUESDAY", "WEDNESDAY", "THURSDAY", "FRIDAY"];

/// Account and personal details shared by teachers and students.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonInput {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Absent on update means "keep the current password".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub name: String,
    pub surname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub address: String,
    pub blood_type: String,
    pub birthday: NaiveDate,
    pub sex: Sex,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherInput {
    #[serde(flatten)]
    pub person: PersonInput,
    pub subjects: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentInput {
    #[serde(flatten)]
    pub person: PersonInput,
    pub grade_id: i64,
    pub class_id: i64,
    pub parent_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInput {
    pub name: String,
    pub capacity: i64,
    pub grade_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supervisor_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonInput {
    pub name: String,
    pub day: Day,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub subject_id: i64,
    pub class_id: i64,
    pub teacher_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamInput {
    pub title: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub lesson_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentInput {
    pub title: String,
    pub start_date: NaiveDateTime,
    pub due_date: NaiveDateTime,
    pub lesson_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultInput {
    pub score: f64,
    pub student_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceInput {
    pub date: NaiveDateTime,
    pub present: bool,
    pub student_id: String,
    pub lesson_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementInput {
    pub title: String,
    pub description: String,
    pub date: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<i64>,
}

/// A validated submission, ready to hand to a mutation action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Teacher(TeacherInput),
    Student(StudentInput),
    Class(ClassInput),
    Lesson(LessonInput),
    Exam(ExamInput),
    Assignment(AssignmentInput),
    Result(ResultInput),
    Attendance(AttendanceInput),
    Event(EventInput),
    Announcement(AnnouncementInput),
}

impl Payload {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Teacher(_) => EntityKind::Teacher,
            Self::Student(_) => EntityKind::Student,
            Self::Class(_) => EntityKind::Class,
            Self::Lesson(_) => EntityKind::Lesson,
            Self::Exam(_) => EntityKind::Exam,
            Self::Assignment(_) => EntityKind::Assignment,
            Self::Result(_) => EntityKind::Result,
            Self::Attendance(_) => EntityKind::Attendance,
            Self::Event(_) => EntityKind::Event,
            Self::Announcement(_) => EntityKind::Announcement,
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

type Parsed<T> = Result<T, FieldErrors>;

fn person(f: &mut Fields<'_>, mode: FormMode) -> PersonInput {
    let username = f.required_text_len("username", 3, 20);
    let email = f.optional_email("email");
    let password = match mode {
        FormMode::Create => Some(f.required_text_len("password", 8, 128)),
        _ => match f.optional_text("password") {
            Some(p) if p.chars().count() < 8 => {
                f.reject(
                    "password",
                    ErrorCode::InvalidValue,
                    "Must be at least 8 characters long!",
                );
                None
            }
            other => other,
        },
    };
    let name = f.required_text("name");
    let surname = f.required_text("surname");
    let phone = f.optional_text("phone");
    let address = f.required_text("address");
    let blood_type = f.required_text("bloodType");
    let birthday = f.required_date("birthday");
    let sex = match f.required_choice("sex", &SEX_CHOICES).as_str() {
        "FEMALE" => Sex::Female,
        _ => Sex::Male,
    };
    PersonInput {
        username,
        email,
        password,
        name,
        surname,
        phone,
        address,
        blood_type,
        birthday,
        sex,
    }
}

pub fn parse_teacher(raw: &Map<String, Value>, mode: FormMode) -> Parsed<TeacherInput> {
    let mut f = Fields::new(raw);
    let person = person(&mut f, mode);
    let subjects = f.optional_int_list("subjects");
    f.finish()?;
    Ok(TeacherInput { person, subjects })
}

pub fn parse_student(raw: &Map<String, Value>, mode: FormMode) -> Parsed<StudentInput> {
    let mut f = Fields::new(raw);
    let person = person(&mut f, mode);
    let grade_id = f.required_int_min("gradeId", 1);
    let class_id = f.required_int_min("classId", 1);
    let parent_id = f.required_ref("parentId");
    f.finish()?;
    Ok(StudentInput {
        person,
        grade_id,
        class_id,
        parent_id,
    })
}

pub fn parse_class(raw: &Map<String, Value>) -> Parsed<ClassInput> {
    let mut f = Fields::new(raw);
    let name = f.required_text("name");
    let capacity = f.required_int_min("capacity", 1);
    let grade_id = f.required_int_min("gradeId", 1);
    let supervisor_id = f.optional_ref("supervisorId");
    f.finish()?;
    Ok(ClassInput {
        name,
        capacity,
        grade_id,
        supervisor_id,
    })
}

pub fn parse_lesson(raw: &Map<String, Value>) -> Parsed<LessonInput> {
    let mut f = Fields::new(raw);
    let name = f.required_text("name");
    let day = match f.required_choice("day", &DAY_CHOICES).as_str() {
        "TUESDAY" => Day::Tuesday,
        "WEDNESDAY" => Day::Wednesday,
        "THURSDAY" => Day::Thursday,
        "FRIDAY" => Day::Friday,
        _ => Day::Monday,
    };
    let start_time = f.required_datetime("startTime");
    let end_time = f.required_datetime("endTime");
    f.ordered(
        "startTime",
        start_time,
        "endTime",
        end_time,
        "End time must be after start time!",
    );
    let subject_id = f.required_int("subjectId");
    let class_id = f.required_int("classId");
    let teacher_id = f.required_ref("teacherId");
    f.finish()?;
    Ok(LessonInput {
        name,
        day,
        start_time,
        end_time,
        subject_id,
        class_id,
        teacher_id,
    })
}

pub fn parse_exam(raw: &Map<String, Value>) -> Parsed<ExamInput> {
    let mut f = Fields::new(raw);
    let title = f.required_text("title");
    let start_time = f.required_datetime("startTime");
    let end_time = f.required_datetime("endTime");
    f.ordered(
        "startTime",
        start_time,
        "endTime",
        end_time,
        "End time must be after start time!",
    );
    let lesson_id = f.required_int("lessonId");
    f.finish()?;
    Ok(ExamInput {
        title,
        start_time,
        end_time,
        lesson_id,
    })
}

pub fn parse_assignment(raw: &Map<String, Value>) -> Parsed<AssignmentInput> {
    let mut f = Fields::new(raw);
    let title = f.required_text("title");
    let start_date = f.required_datetime("startDate");
    let due_date = f.required_datetime("dueDate");
    f.ordered(
        "startDate",
        start_date,
        "dueDate",
        due_date,
        "Due date must be after start date!",
    );
    let lesson_id = f.required_int("lessonId");
    f.finish()?;
    Ok(AssignmentInput {
        title,
        start_date,
        due_date,
        lesson_id,
    })
}

pub fn parse_result(raw: &Map<String, Value>) -> Parsed<ResultInput> {
    let mut f = Fields::new(raw);
    let score = f.required_number_range("score", 0.0, 100.0);
    let student_id = f.required_ref("studentId");
    let exam_id = f.optional_int("examId");
    let assignment_id = f.optional_int("assignmentId");
    if exam_id.is_none() && assignment_id.is_none() && f.valid(&["examId", "assignmentId"]) {
        f.reject(
            "examId",
            ErrorCode::Required,
            "Select an exam or an assignment!",
        );
    }
    f.finish()?;
    Ok(ResultInput {
        score,
        student_id,
        exam_id,
        assignment_id,
    })
}

pub fn parse_attendance(raw: &Map<String, Value>) -> Parsed<AttendanceInput> {
    let mut f = Fields::new(raw);
    let date = f.required_datetime("date");
    let present = f.required_bool("present");
    let student_id = f.required_ref("studentId");
    let lesson_id = f.required_int("lessonId");
    f.finish()?;
    Ok(AttendanceInput {
        date,
        present,
        student_id,
        lesson_id,
    })
}

pub fn parse_event(raw: &Map<String, Value>) -> Parsed<EventInput> {
    let mut f = Fields::new(raw);
    let title = f.required_text("title");
    let description = f.required_text("description");
    let start_time = f.required_datetime("startTime");
    let end_time = f.required_datetime("endTime");
    f.ordered(
        "startTime",
        start_time,
        "endTime",
        end_time,
        "End time must be after start time!",
    );
    let class_id = f.optional_int("classId");
    f.finish()?;
    Ok(EventInput {
        title,
        description,
        start_time,
        end_time,
        class_id,
    })
}

pub fn parse_announcement(raw: &Map<String, Value>) -> Parsed<AnnouncementInput> {
    let mut f = Fields::new(raw);
    let title = f.required_text("title");
    let description = f.required_text("description");
    let date = f.required_datetime("date");
    let class_id = f.optional_int("classId");
    f.finish()?;
    Ok(AnnouncementInput {
        title,
        description,
        date,
        class_id,
    })
}
