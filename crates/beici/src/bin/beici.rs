//! beici 终端前端
//!
//! 行式交互驱动学习会话。任何错误都只打印提示，循环继续。
//! 输入 help 查看全部命令。

use std::io::{stdin, stdout, Write};

use beici::algo::FilterCriteria;
use beici::audio::AudioCache;
use beici::platform::tts::{EspeakEngine, VoiceGender, VoiceSettings};
use beici::session::StudyMode;
use beici::{AppConfig, Session, UserProgressStore, WordBank};

fn main() {
    let config = AppConfig::from_env();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    let bank = match WordBank::load(&config.word_bank) {
        Ok(bank) => bank,
        Err(e) => {
            eprintln!("警告: {e}，以空词库启动");
            WordBank::empty()
        }
    };

    let store = match UserProgressStore::new(config.user_dir.clone()) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("无法打开用户目录: {e}");
            return;
        }
    };

    let cache = match AudioCache::new(config.audio_dir.clone()) {
        Ok(cache) => Some(cache),
        Err(e) => {
            eprintln!("警告: 音频缓存不可用: {e}");
            None
        }
    };
    let engine = EspeakEngine::default();

    let mut session = Session::new(bank, store);

    println!("背词 - 英语单词背诵工具 ({} 个词条)。输入 help 查看命令。", session.bank().len());

    loop {
        print!("> ");
        let _ = stdout().flush();

        let mut line = String::new();
        if stdin().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let mut parts = line.split_whitespace();
        let cmd = match parts.next() {
            Some(cmd) => cmd,
            None => continue,
        };
        let args: Vec<&str> = parts.collect();

        match cmd {
            "help" => print_help(),
            "exit" | "quit" => break,

            // ---- 用户管理 ----
            "users" => match session.list_users() {
                Ok(users) if users.is_empty() => println!("还没有用户，用 new <名字> 创建。"),
                Ok(users) => println!("用户: {}", users.join(", ")),
                Err(e) => println!("提示: {e}"),
            },
            "new" => match args.first() {
                Some(name) => report(session.create_user(name).map(|_| format!("用户 {name} 已创建并选中"))),
                None => println!("用法: new <名字>"),
            },
            "user" => match args.first() {
                Some(name) => report(session.select_user(name).map(|_| format!("当前用户: {name}"))),
                None => println!("用法: user <名字>"),
            },
            "deluser" => report(session.delete_current_user().map(|name| format!("用户 {name} 已删除"))),
            "reset" => report(session.reset_progress().map(|_| "学习进度已重置".to_string())),

            // ---- 筛选 ----
            "units" => println!("单元: {}", session.bank().units().join(", ")),
            "types" => println!("词性: {}", session.bank().parts_of_speech().join(", ")),
            "unit" => {
                let mut criteria = session.criteria().clone();
                criteria.units = args.iter().map(|s| s.to_string()).collect();
                apply_filter(&mut session, criteria);
            }
            "type" => {
                let mut criteria = session.criteria().clone();
                criteria.types = args.iter().map(|s| s.to_string()).collect();
                apply_filter(&mut session, criteria);
            }
            "review" => {
                let mut criteria = session.criteria().clone();
                criteria.review_only = matches!(args.first(), Some(&"on"));
                apply_filter(&mut session, criteria);
            }

            // ---- 学习模式 ----
            "mode" => match args.first() {
                Some(&"card") => session.set_mode(StudyMode::Flashcard),
                Some(&"quiz") => session.set_mode(StudyMode::Quiz),
                Some(&"spell") => session.set_mode(StudyMode::Spelling),
                _ => println!("用法: mode card|quiz|spell"),
            },
            "next" | "n" => match session.advance() {
                Ok(_) => show_current(&mut session),
                Err(e) => println!("提示: {e}"),
            },
            "show" => {
                session.reveal_answer();
                match session.current_word() {
                    Some(word) => println!(
                        "{} - {} | 词性: {} | 单元: {} | ID: {}",
                        word.en, word.zh, word.part_of_speech, word.unit, word.id
                    ),
                    None => println!("提示: 先用 next 抽一个单词"),
                }
            }
            "know" | "y" => report(session.mark_current(true).map(|_| "已标记为掌握".to_string())),
            "forget" | "f" => report(session.mark_current(false).map(|_| "已取消掌握标记".to_string())),

            // ---- 作答 ----
            "a" => {
                let choice = args.first().and_then(|s| s.parse::<usize>().ok());
                answer_quiz(&mut session, choice);
            }
            "s" => {
                if args.is_empty() {
                    println!("用法: s <拼写>");
                } else {
                    match session.submit_spelling(&args.join(" ")) {
                        Ok(outcome) if outcome.correct => println!("✓ 拼写正确！"),
                        Ok(outcome) => println!("✗ 拼写错误，正确答案是: {}", outcome.expected),
                        Err(e) => println!("提示: {e}"),
                    }
                }
            }

            // ---- 发音 ----
            "say" => match &cache {
                Some(cache) => {
                    let refresh = matches!(args.first(), Some(&"fresh"));
                    match session.audio_for_current(&engine, cache, refresh) {
                        Ok(Some(path)) => println!("发音文件: {}", path.display()),
                        Ok(None) => println!("提示: 发音生成失败，稍后重试"),
                        Err(e) => println!("提示: {e}"),
                    }
                }
                None => println!("提示: 音频缓存不可用"),
            },
            "voice" => match args.first() {
                Some(&"male") => set_voice(&mut session, Some(VoiceGender::Male), None),
                Some(&"female") => set_voice(&mut session, Some(VoiceGender::Female), None),
                _ => println!("用法: voice male|female"),
            },
            "speed" => match args.first().and_then(|s| s.parse::<u32>().ok()) {
                Some(speed) => set_voice(&mut session, None, Some(speed)),
                None => println!("用法: speed <80-300>"),
            },
            "clearaudio" => match &cache {
                Some(cache) => {
                    let outcome = cache.clear();
                    println!("已删除 {} 个音频缓存文件，跳过 {} 个", outcome.deleted, outcome.skipped);
                }
                None => println!("提示: 音频缓存不可用"),
            },

            // ---- 统计与列表 ----
            "stats" => match session.overview(5) {
                Ok(overview) => {
                    println!("总单词数: {} | 已掌握: {}", overview.total_words, overview.known_words);
                    if !overview.hardest.is_empty() {
                        println!("最难单词 (按错误率):");
                        for hard in &overview.hardest {
                            println!(
                                "  {} ({}): 错误率 {:.0}% (✓{} ✗{})",
                                hard.word.en,
                                hard.word.zh,
                                hard.error_rate * 100.0,
                                hard.stats.correct,
                                hard.stats.wrong
                            );
                        }
                    }
                }
                Err(e) => println!("提示: {e}"),
            },
            "list" => {
                for word in session.filtered_words() {
                    let known = session
                        .progress()
                        .map(|p| p.is_known(&word.key()))
                        .unwrap_or(false);
                    println!(
                        "{:>4}  {} - {} [{} / 单元{}]{}",
                        word.id,
                        word.en,
                        word.zh,
                        word.part_of_speech,
                        word.unit,
                        if known { " ✓" } else { "" }
                    );
                }
                println!("当前单词总数: {}", session.filtered_words().len());
            }

            other => println!("未知命令: {other}，输入 help 查看用法"),
        }
    }

    println!("再见！");
}

fn print_help() {
    println!("用户管理: users | new <名字> | user <名字> | deluser | reset");
    println!("筛选:     units | types | unit [单元..] | type [词性..] | review on|off");
    println!("学习:     mode card|quiz|spell | next (n) | show | know (y) | forget (f)");
    println!("作答:     a <序号>  选择题 | s <拼写>  拼写测试");
    println!("发音:     say [fresh] | voice male|female | speed <80-300> | clearaudio");
    println!("其他:     stats | list | help | exit");
}

/// 打印操作结果或错误提示
fn report(result: Result<String, beici::SessionError>) {
    match result {
        Ok(msg) => println!("{msg}"),
        Err(e) => println!("提示: {e}"),
    }
}

fn apply_filter(session: &mut Session, criteria: FilterCriteria) {
    session.set_filter(criteria);
    println!("当前单词总数: {}", session.filtered_words().len());
}

fn set_voice(session: &mut Session, gender: Option<VoiceGender>, speed: Option<u32>) {
    let current = session.voice_settings().clone();
    let settings = VoiceSettings::new(
        gender.unwrap_or(current.gender),
        speed.unwrap_or(current.speed),
    );
    println!("语音设置: {} / {} wpm", settings.gender.as_str(), settings.speed);
    session.set_voice_settings(settings);
}

/// 按当前模式展示刚抽出的单词
fn show_current(session: &mut Session) {
    let word = match session.current_word() {
        Some(word) => word.clone(),
        None => return,
    };

    match session.mode() {
        StudyMode::Flashcard => {
            println!("单词: {} | 词性: {} | 单元: {}", word.en, word.part_of_speech, word.unit);
            println!("show 显示答案，y 认识 / f 不认识，n 下一个");
        }
        StudyMode::Quiz => {
            println!("请选择单词 {} 的正确中文释义:", word.en);
            match session.quiz_round() {
                Ok(round) => {
                    for (i, option) in round.options.iter().enumerate() {
                        println!("  {}. {}", i + 1, option);
                    }
                    println!("a <序号> 作答");
                }
                Err(e) => println!("提示: {e}"),
            }
        }
        StudyMode::Spelling => {
            println!("请拼写释义为 “{}” ({}) 的英文单词", word.zh, word.part_of_speech);
            println!("s <拼写> 作答");
        }
    }
}

fn answer_quiz(session: &mut Session, choice: Option<usize>) {
    let options = match session.quiz_round() {
        Ok(round) => round.options.clone(),
        Err(e) => {
            println!("提示: {e}");
            return;
        }
    };

    let selected = match choice.and_then(|n| n.checked_sub(1)).and_then(|i| options.get(i)) {
        Some(selected) => selected.clone(),
        None => {
            println!("用法: a <1-{}>", options.len());
            return;
        }
    };

    match session.submit_quiz(&selected) {
        Ok(outcome) if outcome.correct => println!("✓ 回答正确！"),
        Ok(outcome) => println!("✗ 回答错误，正确答案是: {}", outcome.expected),
        Err(e) => println!("提示: {e}"),
    }
}
