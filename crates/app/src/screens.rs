use std::error::Error;
use std::io::{self, Write};

use course_core::live::{LiveSnapshot, LiveStage};
use course_core::model::{LevelNumber, Question, WeekId};
use course_core::session::Advance;
use services::{
    AppServices, DeckKind, GroupGenerator, GroupSizing, LevelAttempt, LiveSessionRunner,
    TutorError,
};

use crate::console::{Console, choice, is_quit, rule};
use crate::markdown::to_plain_text;

type ScreenResult = Result<(), Box<dyn Error>>;

//
// ─── SYLLABUS ──────────────────────────────────────────────────────────────────
//

pub async fn dashboard(app: &AppServices) -> ScreenResult {
    let overview = app.dashboard().overview().await?;
    let course = &overview.course;

    println!("{}: {}", course.code, course.title);
    println!("{} · {}", course.instructor, course.semester);
    println!("Textbook: {}", course.textbook);
    rule();

    let week = &overview.current_week;
    println!("Current week {} ({}): {}", week.id, week.dates, week.title);
    for topic in &week.topics {
        println!("  • {topic}");
    }
    if !week.readings.is_empty() {
        println!("  Reading: {}", week.readings.join(", "));
    }

    println!();
    println!("Upcoming deadlines");
    if overview.upcoming.is_empty() {
        println!("  nothing left on the schedule");
    }
    for deadline in &overview.upcoming {
        println!("  Week {:>2} {:<14} {}", deadline.week_id.value(), deadline.dates, deadline.item);
    }

    println!();
    println!("Grade breakdown");
    for assignment in &overview.assignments {
        println!("  {:>3}%  {}", assignment.weight, assignment.name);
    }
    let by_category = overview
        .weight_by_category
        .iter()
        .map(|c| format!("{} {}%", c.category, c.weight))
        .collect::<Vec<_>>()
        .join(" · ");
    println!("  ({by_category})");
    Ok(())
}

pub async fn schedule(app: &AppServices, week: Option<WeekId>) -> ScreenResult {
    let dashboard = app.dashboard();
    if let Some(id) = week {
        let week = dashboard.week_detail(id).await?;
        println!("Week {} · {} · {}", week.id, week.dates, week.title);
        rule();
        println!("Topics:   {}", week.topics.join(", "));
        let readings = if week.readings.is_empty() {
            "none".to_string()
        } else {
            week.readings.join(", ")
        };
        println!("Readings: {readings}");
        if week.has_deadlines() {
            println!("Due:      {}", week.due.join(", "));
        }
        return Ok(());
    }

    let current = dashboard.current_week().await?.id;
    for week in dashboard.schedule().await? {
        let marker = if week.id == current { "▶" } else { " " };
        let due = if week.has_deadlines() {
            format!("  [due: {}]", week.due.join(", "))
        } else {
            String::new()
        };
        println!("{marker} {:>2}  {:<14} {}{due}", week.id.value(), week.dates, week.title);
    }
    Ok(())
}

pub async fn concepts(app: &AppServices, dimension: Option<&str>) -> ScreenResult {
    let explorer = app.concepts();
    if let Some(id) = dimension {
        let d = explorer.compare(id).await?;
        println!("{} (chapter {})", d.name, d.chapter);
        println!("{}", d.category.label());
        rule();
        println!("{}", d.description);
        println!();
        println!("Westminster: {}", d.westminster);
        println!("Consensus:   {}", d.consensus);
        return Ok(());
    }

    for group in explorer.groups().await? {
        println!("{}", group.category.label());
        for d in &group.dimensions {
            println!("  {:<16} {} (ch. {})", d.id, d.name, d.chapter);
        }
        println!();
    }
    println!("Use --dimension <id> to compare the two models.");
    Ok(())
}

//
// ─── STUDY ─────────────────────────────────────────────────────────────────────
//

pub async fn flashcards(app: &AppServices, deck: DeckKind, console: &mut Console) -> ScreenResult {
    let mut player = app.flashcards().player(deck).await?;
    println!("{deck}: Enter flips, n next, p previous, q quits.");

    loop {
        let (position, total) = player.position();
        let face = if player.is_flipped() { "back" } else { "front" };
        rule();
        println!("Card {position} of {total} ({face})");
        println!("{}", player.visible_face());

        let Some(input) = console.prompt("> ").await? else {
            return Ok(());
        };
        match input.as_str() {
            "" | "f" => player.flip(),
            "n" => {
                player.next();
            }
            "p" => {
                player.previous();
            }
            other if is_quit(other) => return Ok(()),
            _ => println!("Enter flips, n next, p previous, q quits."),
        }
    }
}

fn print_question(question: &Question, index: usize, total: usize) {
    rule();
    println!("Question {} of {}", index + 1, total);
    println!("{}", question.prompt());
    for (n, option) in question.options().iter().enumerate() {
        match option.color {
            Some(color) => println!("  {} {}. {}", color.glyph(), n + 1, option.text),
            None => println!("  {}. {}", n + 1, option.text),
        }
    }
}

pub async fn quiz(app: &AppServices, console: &mut Console) -> ScreenResult {
    let quiz = app.tiered_quiz();
    loop {
        rule();
        for level in quiz.levels()? {
            let lock = if level.unlocked { "" } else { "  [locked]" };
            let pass = if level.is_final {
                "final level".to_string()
            } else {
                format!("pass at {}%", level.min_score_to_unlock)
            };
            println!(
                "{}. {} ({} questions, {pass}){lock}",
                level.number, level.title, level.question_count
            );
        }

        let Some(input) = console.prompt("Level (q to quit): ").await? else {
            return Ok(());
        };
        if is_quit(&input) {
            return Ok(());
        }
        let Ok(number) = input.parse::<LevelNumber>() else {
            println!("Enter a level number.");
            continue;
        };
        let mut attempt = match quiz.start_level(number) {
            Ok(attempt) => attempt,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        println!("{}", attempt.level().description());

        if !play_level(&mut attempt, console).await? {
            continue;
        }
        let result = quiz.finish(&attempt)?;
        rule();
        println!(
            "Score: {} / {} ({}%)",
            result.result.score, result.result.total, result.percent()
        );
        if let Some(next) = result.unlocked_next {
            println!("Level {next} unlocked!");
        } else if result.is_final {
            println!("You completed the final level.");
        } else if !result.passed {
            println!("Keep practising to unlock the next level.");
        }
    }
}

/// Returns `false` when the learner quits mid-level.
async fn play_level(attempt: &mut LevelAttempt, console: &mut Console) -> Result<bool, Box<dyn Error>> {
    loop {
        let session = attempt.session_mut();
        let Some(question) = session.current_question().cloned() else {
            return Ok(true);
        };
        print_question(&question, session.current_index(), session.total_questions());

        let option = loop {
            let Some(input) = console.prompt("Answer: ").await? else {
                return Ok(false);
            };
            if is_quit(&input) {
                return Ok(false);
            }
            match choice(&input, question.options().len()) {
                Some(i) => break question.options()[i].id.clone(),
                None => println!("Pick 1-{}.", question.options().len()),
            }
        };

        let session = attempt.session_mut();
        let outcome = session.answer(&option)?;
        if outcome.record.is_correct {
            println!("Correct!");
        } else {
            println!("Incorrect. The answer is: {}", question.correct_option().text);
        }
        if !question.explanation().is_empty() {
            println!("{}", question.explanation());
        }

        if console.prompt("Press Enter to continue ").await?.is_none() {
            return Ok(false);
        }
        if let Advance::Finished(_) = attempt.session_mut().advance()? {
            return Ok(true);
        }
    }
}

//
// ─── LIVE ──────────────────────────────────────────────────────────────────────
//

pub async fn live(app: &AppServices, week: Option<WeekId>, console: &mut Console) -> ScreenResult {
    let service = app.live();
    let week = match week {
        Some(week) => week,
        None => {
            let quizzes = service.list().await?;
            for (n, quiz) in quizzes.iter().enumerate() {
                let lock = if quiz.is_locked { "  [locked]" } else { "" };
                println!(
                    "{}. Week {}: {} ({} questions){lock}",
                    n + 1,
                    quiz.week_id,
                    quiz.title,
                    quiz.question_count
                );
            }
            let Some(input) = console.prompt("Quiz: ").await? else {
                return Ok(());
            };
            match choice(&input, quizzes.len()) {
                Some(i) => quizzes[i].week_id,
                None => return Ok(()),
            }
        }
    };

    let runner = service.open(week).await?;
    let mut rx = runner.subscribe();
    let mut last = rx.borrow_and_update().clone();
    render_live(&last, None);

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let snapshot = rx.borrow_and_update().clone();
                render_live(&snapshot, Some(&last));
                if snapshot.stage == LiveStage::Summary {
                    return Ok(());
                }
                last = snapshot;
            }
            line = console.next_line() => {
                let Some(input) = line? else {
                    return Ok(());
                };
                if is_quit(&input) {
                    return Ok(());
                }
                if let Err(err) = live_input(&runner, &input) {
                    println!("\n{err}");
                }
            }
        }
    }
}

fn live_input(runner: &LiveSessionRunner, input: &str) -> Result<(), Box<dyn Error>> {
    let snapshot = runner.snapshot();
    match snapshot.stage {
        LiveStage::Lobby => {
            runner.launch()?;
        }
        LiveStage::Question { .. } => {
            let Some(question) = snapshot.question else {
                return Ok(());
            };
            match choice(input, question.options().len()) {
                Some(i) => {
                    runner.answer(&question.options()[i].id)?;
                }
                None => println!("\nPick 1-{}.", question.options().len()),
            }
        }
        LiveStage::VotingClosed => {
            runner.reveal()?;
        }
        LiveStage::Results => {
            runner.next_slide()?;
        }
        LiveStage::GetReady | LiveStage::Summary => {}
    }
    Ok(())
}

fn render_live(snapshot: &LiveSnapshot, previous: Option<&LiveSnapshot>) {
    let same_question = previous.is_some_and(|p| {
        matches!(p.stage, LiveStage::Question { .. }) && p.question_index == snapshot.question_index
    });

    match snapshot.stage {
        LiveStage::Lobby => {
            rule();
            println!("{} · week {}", snapshot.title, snapshot.week_id);
            println!("{} questions. Press Enter to start.", snapshot.total_questions);
        }
        LiveStage::GetReady => {
            rule();
            println!(
                "Get ready! Question {} of {} is coming up…",
                snapshot.question_index + 1,
                snapshot.total_questions
            );
        }
        LiveStage::Question { remaining_secs } if same_question => {
            print!("\r  ⏱ {remaining_secs:>3}s ");
            let _ = io::stdout().flush();
        }
        LiveStage::Question { remaining_secs } => {
            if let Some(question) = &snapshot.question {
                print_question(question, snapshot.question_index, snapshot.total_questions);
            }
            print!("  ⏱ {remaining_secs:>3}s ");
            let _ = io::stdout().flush();
        }
        LiveStage::VotingClosed => {
            println!();
            println!("Time's up! Voting is closed. Press Enter to reveal the answer.");
        }
        LiveStage::Results => {
            println!();
            if let Some(correct) = &snapshot.correct_option {
                let verdict = match &snapshot.selected {
                    Some(selected) if *selected == correct.id => "You got it!",
                    Some(_) => "Not quite.",
                    None => "No answer.",
                };
                println!("{verdict} Correct answer: {}", correct.text);
            }
            if let Some(question) = &snapshot.question {
                println!("{}", question.explanation());
            }
            println!("Score: {}. Press Enter for the next slide.", snapshot.score);
        }
        LiveStage::Summary => {
            rule();
            if let Some(result) = snapshot.result {
                println!(
                    "Session over: {} / {} correct ({}%).",
                    result.score, result.total, result.percent
                );
            }
        }
    }
}

//
// ─── AI ────────────────────────────────────────────────────────────────────────
//

pub async fn tutor(app: &AppServices, console: &mut Console) -> ScreenResult {
    let mut conversation = app.conversation();
    if let Some(greeting) = conversation.turns().first() {
        println!("Tutor: {}", greeting.text);
    }
    loop {
        let Some(input) = console.prompt("\nYou: ").await? else {
            return Ok(());
        };
        if is_quit(&input) {
            return Ok(());
        }
        match conversation.send(&input).await {
            Ok(reply) => println!("\nTutor: {}", to_plain_text(&reply.text)),
            Err(TutorError::BlankMessage) => continue,
            Err(err) => return Err(err.into()),
        }
    }
}

pub async fn outline(app: &AppServices, country: &str, interest: &str) -> ScreenResult {
    let mut wizard = app.project_assistant().await?;
    wizard.select_country(country)?;
    println!("Generating an outline for {country}…");
    let outline = wizard.generate_outline(interest).await?;
    rule();
    println!("{}", to_plain_text(outline));
    Ok(())
}

pub fn groups(names: &[String], sizing: GroupSizing) -> ScreenResult {
    for (n, group) in GroupGenerator::generate(names, sizing)?.iter().enumerate() {
        println!("Group {}: {}", n + 1, group.join(", "));
    }
    Ok(())
}
