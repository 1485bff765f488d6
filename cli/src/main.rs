use clap::{Parser, Subcommand};
use lectern::action::{ActionContext, ActionError, Actor, Notice};
use lectern::course::{AuthoringSession, BlockKind, CourseField, CourseLevel, LessonId};
use lectern::error::{AppResult, run_with_error_handler};
use lectern::model::{CourseStore, ModelManager};
use lectern::Store;
use lectern::progress::ProgressTracker;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(about = "CLI tool for authoring courses and tracking progress", long_about = None)]
pub struct Cli {
    /// Acting user id, falls back to LECTERN_USER
    #[arg(long = "as", global = true, env = "LECTERN_USER")]
    pub user: Option<Uuid>,

    /// Use ./config.toml instead of the per-user config
    #[arg(long, global = true, default_value_t = false)]
    pub local: bool,

    /// Store call timeout in seconds when DATABASE_URL is set
    #[arg(long, global = true, env = "LECTERN_STORE_TIMEOUT")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage courses
    Course {
        #[command(subcommand)]
        action: CourseCommands,
    },

    /// Manage lessons of an existing course
    Lesson {
        #[command(subcommand)]
        action: LessonCommands,
    },

    /// Enroll the acting user in a course
    Enroll { course_id: Uuid },

    /// Mark a lesson complete for the acting user
    Complete { course_id: Uuid, lesson_id: String },

    /// Show the acting user's progress in a course
    Progress { course_id: Uuid },
}

/// Course management
#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    /// Courses of the acting instructor
    List,
    Show {
        course_id: Uuid,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, value_parser = parse_level)]
        level: Option<CourseLevel>,
        /// Title of an extra lesson, may be repeated
        #[arg(long = "lesson")]
        lessons: Vec<String>,
    },
    Publish {
        course_id: Uuid,
        #[arg(long, default_value_t = false)]
        unpublish: bool,
    },
}

/// Lesson management
#[derive(Subcommand, Debug)]
pub enum LessonCommands {
    Add {
        course_id: Uuid,
        #[arg(long)]
        title: String,
        /// Path to a text file with lesson content
        #[arg(long)]
        file: Option<String>,
        /// Link block, `<url> - <description>`; may be repeated
        #[arg(long = "link")]
        links: Vec<String>,
    },
    Rename {
        course_id: Uuid,
        lesson_id: String,
        #[arg(long)]
        title: String,
    },
    Move {
        course_id: Uuid,
        #[arg(long)]
        from: usize,
        #[arg(long)]
        to: usize,
    },
}

fn parse_level(value: &str) -> Result<CourseLevel, String> {
    CourseLevel::parse(value)
        .ok_or_else(|| format!("unknown level `{value}`, expected beginner, intermediate, advanced or all-levels"))
}

async fn save(session: &mut AuthoringSession, mm: &ModelManager, ctx: &ActionContext) -> AppResult<()> {
    match session.save(mm, ctx).await? {
        Some(saved) => println!(
            "{}",
            Notice::success(
                "Course saved",
                format!(
                    "course {} ({} lessons inserted, {} updated)",
                    saved.course_id, saved.inserted, saved.updated
                ),
            )
        ),
        None => println!("A save is already in progress."),
    }
    Ok(())
}

fn print_session(session: &AuthoringSession) {
    let details = session.details();
    println!("{} [{}]", details.title, details.status());
    if let Some(description) = &details.description {
        println!("  {description}");
    }
    for lesson in session.lessons() {
        println!("  {:>2}. {} ({})", lesson.order_index + 1, lesson.title, lesson.id);
        for block in &lesson.content {
            match block.kind {
                BlockKind::Link => {
                    let (url, description) = block.link_parts();
                    println!("      - link: {url} {}", description.unwrap_or_default());
                }
                kind => println!("      - {kind}: {}", block.content),
            }
        }
    }
}

async fn run(args: Cli) -> AppResult<()> {
    let mm = match std::env::var("DATABASE_URL") {
        Ok(uri) => {
            let store = Store::new(uri, args.timeout)?;
            lectern::build_store_with_uri(store.database_uri(), store.timeout()).await?
        }
        Err(_) => lectern::build_store(args.local).await?,
    };
    let ctx = ActionContext::new(args.user.map(Actor::instructor));
    let student = ActionContext::new(args.user.map(Actor::student));

    match args.command {
        Commands::Course { action } => match action {
            CourseCommands::List => {
                let actor = ctx.user()?;
                for course in mm.list_courses_by_instructor(actor.user_id()).await? {
                    println!(
                        "{} {} ({} lessons, {})",
                        course.id,
                        course.title,
                        course.lessons_count,
                        if course.published { "published" } else { "draft" }
                    );
                }
            }

            CourseCommands::Show { course_id } => {
                let session = AuthoringSession::load(&mm, course_id).await?;
                print_session(&session);
            }

            CourseCommands::Create { title, description, category, level, lessons } => {
                let mut session = AuthoringSession::new();
                session.update_course_details(CourseField::Title(title));
                session.update_course_details(CourseField::Description(description));
                session.update_course_details(CourseField::Category(category));
                session.update_course_details(CourseField::Level(level));
                for lesson_title in lessons {
                    session.add_lesson();
                    session.update_lesson_title(lesson_title);
                }
                save(&mut session, &mm, &ctx).await?;
            }

            CourseCommands::Publish { course_id, unpublish } => {
                let mut session = AuthoringSession::load(&mm, course_id).await?;
                session.set_published(&mm, &ctx, !unpublish).await?;
                println!("course {course_id} is now {}", session.details().status());
            }
        },

        Commands::Lesson { action } => match action {
            LessonCommands::Add { course_id, title, file, links } => {
                let mut session = AuthoringSession::load(&mm, course_id).await?;
                session.add_lesson();
                session.update_lesson_title(title);

                if let Some(file) = file {
                    let text = std::fs::read_to_string(file)?;
                    let first = session.content_blocks().first().map(|b| b.id.clone());
                    if let Some(first) = first {
                        session.update_block_content(&first, text);
                    }
                }
                for link in links {
                    if let Some(id) = session.add_content_block(BlockKind::Link) {
                        session.update_block_content(&id, link);
                    }
                }
                save(&mut session, &mm, &ctx).await?;
            }

            LessonCommands::Rename { course_id, lesson_id, title } => {
                let mut session = AuthoringSession::load(&mm, course_id).await?;
                let lesson_id = LessonId::new(lesson_id);
                if !session.rename_lesson(&lesson_id, title) {
                    return Err(ActionError::unknown_lesson(lesson_id.as_str()).into());
                }
                save(&mut session, &mm, &ctx).await?;
            }

            LessonCommands::Move { course_id, from, to } => {
                let mut session = AuthoringSession::load(&mm, course_id).await?;
                session.reorder_lessons(from, to);
                save(&mut session, &mm, &ctx).await?;
            }
        },

        Commands::Enroll { course_id } => {
            let mut tracker = ProgressTracker::load(&mm, &student, course_id).await?;
            let enrollment = tracker.enroll(&mm).await?;
            println!("{}", Notice::success("Enrolled", format!("enrollment {}", enrollment.id())));
        }

        Commands::Complete { course_id, lesson_id } => {
            let mut tracker = ProgressTracker::load(&mm, &student, course_id).await?;
            tracker.mark_complete(&mm, &lesson_id).await?;
            println!("{}", Notice::success("Success", "Lesson marked as complete!"));
            if let Some(next) = tracker.next_uncompleted(&lesson_id) {
                println!("next up: {} ({})", next.title, next.id);
            }
        }

        Commands::Progress { course_id } => {
            let tracker = ProgressTracker::load(&mm, &student, course_id).await?;
            let progress = tracker.course_progress();
            println!(
                "{}/{} lessons completed ({:.0}%)",
                progress.completed_lessons,
                progress.total_lessons,
                progress.percentage()
            );
            for lesson in tracker.lessons() {
                let mark = if tracker.is_completed(&lesson.id) { "x" } else { " " };
                println!("  [{mark}] {} ({})", lesson.title, lesson.id);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    lectern::setup_trace();
    let args = Cli::parse();
    run_with_error_handler(async move || run(args).await).await;
}
