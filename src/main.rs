//! StreamX Video - desktop client
//! Subscription video gallery with login, checkout and gated downloads

// Hide console window on Windows release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

// Use mimalloc for faster memory allocation (Linux, macOS)
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use eframe::egui;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use std::time::Duration;

use chrono::{Local, Utc};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod config;
mod controller;
mod error;
mod i18n;
mod location;
mod models;
mod pagination;
mod payment_return;
mod session;
mod status;
#[cfg(test)]
mod testing;

use api::{AuthResponse, Backend, BackendClient, PaymentResponse};
use config::AppConfig;
use controller::{Context, DownloadRejection, RequestKind, ViewController};
use error::ApiError;
use i18n::{Language, Strings};
use location::Location;
use models::{AuthMode, Screen, VideoRecord, ViewState};
use pagination::PAGE_SIZE;
use payment_return::{PaymentReturn, ReturnState};
use session::FileSessionStore;

/// StreamX Video command line
#[derive(Parser, Debug)]
#[command(name = "streamx_video", version, about = "StreamX Video desktop client")]
struct Args {
    /// Launch location, e.g. `streamx://app/?page=2` or
    /// `streamx://app/success?token=...&email=...`
    location: Option<String>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(long)]
    log_level: Option<String>,

    /// Backend base URL override
    #[arg(long)]
    backend: Option<String>,
}

/// Flag first, then `RUST_LOG`, then the configured level
fn init_tracing(level: Option<&str>, config: &AppConfig) {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .or_else(|| EnvFilter::try_new(&config.log_level).ok())
    .unwrap_or_else(|| EnvFilter::new("info"));

    match config.log_format.as_str() {
        "compact" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(io::stderr))
                .init();
        }
    }
}

/// Get current local time as HH:MM:SS
fn timestamp_now() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Application icon: play triangle on a red gradient
fn load_icon() -> egui::IconData {
    let size: usize = 64;
    let mut rgba = vec![0u8; size * size * 4];

    for y in 0..size {
        for x in 0..size {
            let idx = (y * size + x) * 4;
            let nx = x as f32 / size as f32;
            let ny = y as f32 / size as f32;

            // Play triangle centred slightly right of the middle
            let px = nx - 0.36;
            let py = ny - 0.5;
            let in_play = (0.0..=0.34).contains(&px) && py.abs() <= (0.34 - px) * 0.6;

            let (r, g, b) = if in_play {
                (255, 255, 255)
            } else {
                let t = (nx + ny) * 0.5;
                ((220.0 - 90.0 * t) as u8, (38.0 - 20.0 * t) as u8, (38.0 + 20.0 * t) as u8)
            };
            rgba[idx] = r;
            rgba[idx + 1] = g;
            rgba[idx + 2] = b;
            rgba[idx + 3] = 255;
        }
    }

    egui::IconData {
        rgba,
        width: size as u32,
        height: size as u32,
    }
}

/// Register the first system emoji font found, so status markers render
fn load_emoji_font(fonts: &mut egui::FontDefinitions) {
    #[cfg(target_os = "windows")]
    let paths: &[&str] = &["C:\\Windows\\Fonts\\seguiemj.ttf"];
    #[cfg(target_os = "macos")]
    let paths: &[&str] = &["/System/Library/Fonts/Apple Color Emoji.ttc"];
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let paths: &[&str] = &[
        "/usr/share/fonts/truetype/noto/NotoColorEmoji.ttf",
        "/usr/share/fonts/noto-emoji/NotoColorEmoji.ttf",
        "/usr/share/fonts/google-noto-emoji/NotoColorEmoji.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    ];

    for path in paths {
        if let Ok(font_data) = std::fs::read(path) {
            fonts.font_data.insert(
                "emoji".to_owned(),
                egui::FontData::from_owned(font_data).into(),
            );
            fonts.families
                .entry(egui::FontFamily::Proportional)
                .or_default()
                .push("emoji".to_owned());
            break;
        }
    }
}

/// Background task messages
enum TaskResult {
    VideosLoaded(Result<Vec<VideoRecord>, ApiError>),
    AuthFinished {
        mode: AuthMode,
        email: String,
        result: Result<AuthResponse, ApiError>,
    },
    PaymentStarted(Result<PaymentResponse, ApiError>),
    PaymentConfirmed(Result<(), ApiError>),
    DownloadFinished {
        file_name: String,
        path: PathBuf,
        result: Result<u64, ApiError>,
    },
    PlayerLog(String),
}

/// Card button pressed in the gallery
enum CardAction {
    Play(VideoRecord),
    Download(String),
    Subscribe,
}

fn main() -> Result<(), eframe::Error> {
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(AppConfig::default_path);
    let mut config = AppConfig::load_from(&config_path);
    if let Some(backend) = &args.backend {
        config.backend_url = backend.trim_end_matches('/').to_string();
    }
    init_tracing(args.log_level.as_deref(), &config);

    // An explicit launch location wins over the remembered page
    let launch = match &args.location {
        Some(raw) => Location::parse(raw),
        None if !config.last_query.is_empty() => Location::parse(&format!("?{}", config.last_query)),
        None => Location::default(),
    };
    info!(backend = %config.backend_url, path = launch.path(), "starting StreamX Video");

    // Force X11 backend on Linux before any windowing code runs
    #[cfg(target_os = "linux")]
    {
        std::env::set_var("WINIT_UNIX_BACKEND", "x11");
        std::env::remove_var("WAYLAND_DISPLAY");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([760.0, 520.0])
            .with_icon(load_icon()),
        vsync: true,
        hardware_acceleration: eframe::HardwareAcceleration::Preferred,
        ..Default::default()
    };

    eframe::run_native(
        "StreamX Video",
        options,
        Box::new(move |cc| {
            let mut fonts = egui::FontDefinitions::default();
            load_emoji_font(&mut fonts);
            cc.egui_ctx.set_fonts(fonts);
            cc.egui_ctx.set_zoom_factor(config.font_size.max(8) as f32 / 14.0);
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(StreamXApp::new(config, config_path, launch)))
        }),
    )
}

struct StreamXApp {
    config: AppConfig,
    config_path: PathBuf,
    language: Language,
    client: BackendClient,
    controller: ViewController<FileSessionStore, StdRng>,
    screen: Screen,
    payment_return: Option<PaymentReturn>,

    // Auth form
    auth_mode: AuthMode,
    email_input: String,
    password_input: String,

    // Player
    current_player: Option<Child>,
    // Links waiting for the next frame's `ctx.open_url`
    pending_links: Vec<egui::OpenUrl>,

    // Console
    show_console: bool,
    console_log: Vec<String>,

    task_sender: Sender<TaskResult>,
    task_receiver: Receiver<TaskResult>,
}

impl StreamXApp {
    fn new(config: AppConfig, config_path: PathBuf, launch: Location) -> Self {
        let (task_sender, task_receiver) = channel();
        let language = config.resolved_language();
        let client = BackendClient::new(&config.backend_url, config.timeout_secs());
        let ctx = Context {
            strings: language.strings(),
            backend_url: client.base_url().to_string(),
            provider: config.payment_provider,
            page_size: PAGE_SIZE,
        };
        let store = FileSessionStore::in_dir(&config::app_dir());
        let controller = ViewController::new(ctx, store, StdRng::from_os_rng());

        let mut app = Self {
            email_input: config.last_email.clone(),
            config,
            config_path,
            language,
            client,
            controller,
            screen: Screen::Landing,
            payment_return: None,
            auth_mode: AuthMode::Login,
            password_input: String::new(),
            current_player: None,
            pending_links: Vec::new(),
            show_console: false,
            console_log: Vec::new(),
            task_sender,
            task_receiver,
        };
        app.log(&format!("[INFO] StreamX Video {} | Backend: {}", env!("CARGO_PKG_VERSION"), app.client.base_url()));

        if PaymentReturn::is_return(&launch) {
            app.start_payment_return(&launch);
        } else {
            app.screen = match launch.path() {
                "/landing" | "/marketing" => Screen::Marketing,
                _ if launch.get("page").is_some() || launch.get("message").is_some() => Screen::Gallery,
                _ => Screen::Landing,
            };
            app.initialize(launch);
        }
        app
    }

    fn log(&mut self, message: &str) {
        let timestamp = timestamp_now();
        self.console_log.push(format!("[{}] {}", timestamp, message));
        // Keep last 500 lines
        if self.console_log.len() > 500 {
            self.console_log.remove(0);
        }
    }

    fn strings(&self) -> &'static Strings {
        self.language.strings()
    }

    fn save_config(&mut self) {
        let mut location = self.controller.location().clone();
        location.remove("message");
        location.remove("email");
        self.config.last_query = location.to_query_string();
        self.config.save_to(&self.config_path);
    }

    fn set_language(&mut self, language: Language) {
        self.language = language;
        self.controller.set_strings(Strings::for_language(language));
        self.config.language = Some(language);
        self.save_config();
        self.log(&format!("[INFO] Language: {}", language.code()));
    }

    // ---- backend calls (worker threads) -----------------------------------

    fn initialize(&mut self, location: Location) {
        if self.controller.begin_initialize(location, Utc::now()) {
            let client = self.client.clone();
            let sender = self.task_sender.clone();
            thread::spawn(move || {
                let _ = sender.send(TaskResult::VideosLoaded(client.list_videos()));
            });
            self.log("[INFO] Loading video list...");
        }
        if !self.controller.prefill_email().is_empty() {
            self.email_input = self.controller.prefill_email().to_string();
        }
        match self.controller.view_state() {
            ViewState::Visitor => {}
            state => self.log(&format!("[INFO] Session restored ({:?})", state)),
        }
    }

    fn submit_credentials(&mut self) {
        let Some(credentials) = self.controller.begin_auth(&self.email_input, &self.password_input, Utc::now()) else {
            return;
        };
        let mode = self.auth_mode;
        self.log(&format!("[INFO] {:?} request for {}", mode, credentials.email));

        let client = self.client.clone();
        let sender = self.task_sender.clone();
        thread::spawn(move || {
            let result = client.authenticate(&credentials);
            let _ = sender.send(TaskResult::AuthFinished {
                mode,
                email: credentials.email,
                result,
            });
        });
    }

    fn start_payment(&mut self) {
        let Some(ticket) = self.controller.begin_payment(Utc::now()) else {
            return;
        };
        self.log(&format!("[PAY] Starting {} checkout for {}", ticket.provider.label(), ticket.email));

        let client = self.client.clone();
        let sender = self.task_sender.clone();
        thread::spawn(move || {
            let _ = sender.send(TaskResult::PaymentStarted(client.start_payment(ticket.provider, &ticket.email)));
        });
    }

    fn start_payment_return(&mut self, launch: &Location) {
        let (ret, request) = PaymentReturn::start(launch);
        if let Some(request) = request {
            self.log(&format!("[PAY] Confirming payment for {}", request.email));
            let client = self.client.clone();
            let sender = self.task_sender.clone();
            thread::spawn(move || {
                let _ = sender.send(TaskResult::PaymentConfirmed(client.confirm_payment(&request.token, &request.email)));
            });
        } else {
            self.log("[WARN] Payment return is missing its token or email");
        }
        self.payment_return = Some(ret);
        self.screen = Screen::PaymentReturn;
    }

    fn download_video(&mut self, file: &str) {
        let ticket = match self.controller.begin_download(file, Utc::now()) {
            Ok(ticket) => ticket,
            Err(DownloadRejection::NotSubscribed) => {
                self.log("[WARN] Download blocked: subscription required");
                return;
            }
            Err(DownloadRejection::Busy) => return,
        };

        let mut dialog = rfd::FileDialog::new()
            .set_title(self.strings().download)
            .set_file_name(&ticket.file_name);
        if let Some(dir) = &self.config.download_dir {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.save_file() else {
            self.controller.cancel_download();
            return;
        };
        self.log(&format!("[INFO] Downloading {} to {}", ticket.file_name, path.display()));

        let client = self.client.clone();
        let sender = self.task_sender.clone();
        thread::spawn(move || {
            let result = File::create(&path).map_err(ApiError::from).and_then(|file| {
                let mut out = BufWriter::new(file);
                let bytes = client.download(&ticket.file, &ticket.email, &mut out)?;
                out.flush()?;
                Ok(bytes)
            });
            let _ = sender.send(TaskResult::DownloadFinished {
                file_name: ticket.file_name,
                path,
                result,
            });
        });
    }

    // ---- external processes -----------------------------------------------

    /// Hand the provider checkout (or any web link) to the system browser.
    /// eframe opens it on the next frame without going through a shell.
    fn open_in_browser(&mut self, url: &str) {
        self.log(&format!("[INFO] Opening {}", url));
        self.pending_links.push(browser_link(url));
    }

    /// Play through the external player. Only subscribed members, or anyone
    /// for the teaser.
    fn play_video(&mut self, video: &VideoRecord, is_teaser: bool) {
        if !is_teaser && !self.controller.view_state().is_subscribed() {
            self.log("[WARN] Playback blocked: subscription required");
            return;
        }

        // Single window: close the previous player
        if let Some(ref mut child) = self.current_player {
            let _ = child.kill();
            let _ = child.wait();
        }
        self.current_player = None;

        let player = self.config.player_command().to_string();
        let url = video.playback_url(self.controller.context().backend_url.as_str());
        self.log(&format!("[PLAY] {} | Player: {}", video.title, player));
        self.log(&format!("[PLAY] URL: {}", url));

        let player_lower = player.to_lowercase();
        let mut cmd = Command::new(&player);

        // On Windows, hide the console window for ffplay
        #[cfg(target_os = "windows")]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NO_WINDOW: u32 = 0x08000000;
            if player_lower.contains("ffplay") {
                cmd.creation_flags(CREATE_NO_WINDOW);
            }
        }

        if player_lower.contains("ffplay") {
            cmd.args([url.as_str(), "-autoexit", "-window_title", video.title.as_str()]);
        } else if player_lower.contains("mpv") {
            cmd.arg(&url).arg(format!("--title={}", video.title));
        } else {
            // Generic player - just pass URL
            cmd.arg(&url);
        }

        // Capture stderr for error logging
        cmd.stderr(Stdio::piped());
        cmd.stdout(Stdio::null());

        match cmd.spawn() {
            Ok(mut child) => {
                self.log(&format!("[PLAY] Player launched (PID: {})", child.id()));
                if let Some(stderr) = child.stderr.take() {
                    let sender = self.task_sender.clone();
                    thread::spawn(move || {
                        let reader = BufReader::new(stderr);
                        for line in reader.lines().map_while(Result::ok) {
                            if !line.trim().is_empty() {
                                let _ = sender.send(TaskResult::PlayerLog(format!("[PLAYER] {}", line)));
                            }
                        }
                    });
                }
                self.current_player = Some(child);
            }
            Err(e) => {
                error!(player = %player, "failed to launch player: {}", e);
                self.log(&format!("[ERROR] Failed to launch player '{}': {}", player, e));
            }
        }
    }

    fn poll_player(&mut self) {
        let exited = match self.current_player.as_mut().map(|child| child.try_wait()) {
            Some(Ok(Some(status))) => Some(status),
            Some(Err(e)) => {
                self.log(&format!("[ERROR] Failed to wait for player: {}", e));
                self.current_player = None;
                None
            }
            _ => None,
        };
        if let Some(status) = exited {
            self.current_player = None;
            if !status.success() {
                let msg = match status.code() {
                    Some(code) => format!("[WARN] Player exited with code {}", code),
                    None => "[WARN] Player terminated by signal".to_string(),
                };
                self.log(&msg);
            }
        }
    }

    // ---- task results -------------------------------------------------------

    fn handle_task(&mut self, result: TaskResult) {
        let now = Utc::now();
        match result {
            TaskResult::VideosLoaded(result) => {
                match &result {
                    Ok(videos) => self.log(&format!("[INFO] Loaded {} videos", videos.len())),
                    Err(e) => self.log(&format!("[ERROR] Video list: {}", e)),
                }
                self.controller.finish_videos(result, now);
            }
            TaskResult::AuthFinished { mode, email, result } => {
                if let Err(e) = &result {
                    self.log(&format!("[ERROR] {:?} failed: {}", mode, e));
                }
                if self.controller.finish_auth(result, mode, now) {
                    self.log(&format!("[INFO] Signed in as {} ({:?})", email, self.controller.view_state()));
                    self.password_input.clear();
                    self.config.last_email = email;
                    self.save_config();
                    self.screen = Screen::Gallery;
                } else {
                    self.log("[WARN] Credentials rejected");
                }
            }
            TaskResult::PaymentStarted(result) => {
                if let Err(e) = &result {
                    self.log(&format!("[ERROR] Payment: {}", e));
                }
                if let Some(url) = self.controller.finish_payment(result, now) {
                    self.log("[PAY] Redirecting to provider checkout");
                    self.open_in_browser(&url);
                }
            }
            TaskResult::PaymentConfirmed(result) => {
                if let Err(e) = &result {
                    self.log(&format!("[ERROR] Payment confirmation: {}", e));
                }
                let confirmed = match self.payment_return.as_mut() {
                    Some(ret) => {
                        ret.finish(result, self.controller.store_mut(), now);
                        matches!(ret.state(), ReturnState::Confirmed { .. })
                    }
                    None => false,
                };
                if confirmed {
                    self.log("[PAY] Payment confirmed, stored session cleared");
                }
            }
            TaskResult::DownloadFinished { file_name, path, result } => {
                match &result {
                    Ok(bytes) => self.log(&format!("[INFO] Saved {} ({} bytes)", path.display(), bytes)),
                    Err(e) => {
                        self.log(&format!("[ERROR] Download of {} failed: {}", file_name, e));
                        let _ = std::fs::remove_file(&path);
                    }
                }
                self.controller.finish_download(result, &file_name, now);
            }
            TaskResult::PlayerLog(msg) => {
                self.log(&msg);
            }
        }
    }

    fn any_pending(&self) -> bool {
        [RequestKind::Videos, RequestKind::Auth, RequestKind::Payment, RequestKind::Download]
            .iter()
            .any(|kind| self.controller.is_pending(*kind))
            || matches!(self.payment_return.as_ref().map(|r| r.state()), Some(ReturnState::Verifying))
    }
}

impl eframe::App for StreamXApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Process background task results (non-blocking)
        while let Ok(result) = self.task_receiver.try_recv() {
            self.handle_task(result);
        }

        let now = Utc::now();
        let was_member = self.controller.view_state().is_member();
        if self.controller.tick(now) && was_member && !self.controller.view_state().is_member() {
            self.log("[INFO] Session expired");
        }
        self.poll_player();

        let redirect = self
            .payment_return
            .as_ref()
            .and_then(|ret| ret.poll(self.strings(), now));
        if let Some(next) = redirect {
            self.payment_return = None;
            self.log("[PAY] Returning to the gallery");
            self.screen = Screen::Gallery;
            self.initialize(next);
        }

        // Apply theme
        if self.config.dark_mode {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }

        self.show_top_panel(ctx);
        self.show_status_panel(ctx);
        if self.show_console {
            egui::TopBottomPanel::bottom("console_panel")
                .resizable(true)
                .default_height(180.0)
                .show(ctx, |ui| self.show_console_panel(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.screen {
            Screen::Marketing => self.show_marketing(ui),
            Screen::Landing => self.show_landing(ui),
            Screen::Gallery => self.show_gallery(ui),
            Screen::PaymentReturn => self.show_payment_return(ui),
        });

        for link in self.pending_links.drain(..) {
            ctx.open_url(link);
        }

        // Timers (status auto-clear, session expiry, redirect) need frames
        let wait = if self.any_pending() { 100 } else { 500 };
        ctx.request_repaint_after(Duration::from_millis(wait));
    }
}

impl StreamXApp {
    fn show_top_panel(&mut self, ctx: &egui::Context) {
        let t = self.strings();
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                ui.heading(format!("🔥 {}", t.landing_title));
                ui.separator();

                if ui.selectable_label(self.screen == Screen::Landing, t.welcome).clicked() {
                    self.screen = Screen::Landing;
                }
                if ui.selectable_label(self.screen == Screen::Gallery, t.videos_heading).clicked() {
                    self.screen = Screen::Gallery;
                }
                if ui.selectable_label(self.screen == Screen::Marketing, t.join_now).clicked() {
                    self.screen = Screen::Marketing;
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let console_label = if self.show_console { "🖥 Console ✔" } else { "🖥 Console" };
                    if ui.button(console_label).clicked() {
                        self.show_console = !self.show_console;
                    }

                    let theme = if self.config.dark_mode { "🌙" } else { "☀" };
                    if ui.button(theme).clicked() {
                        self.config.dark_mode = !self.config.dark_mode;
                        self.save_config();
                    }

                    let mut selected = self.language;
                    egui::ComboBox::from_id_salt("language")
                        .selected_text(selected.strings().language_name)
                        .show_ui(ui, |ui| {
                            for lang in Language::ALL {
                                ui.selectable_value(&mut selected, lang, lang.strings().language_name);
                            }
                        });
                    if selected != self.language {
                        self.set_language(selected);
                    }
                });
            });
            ui.add_space(5.0);
        });
    }

    fn show_status_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.any_pending() {
                    ui.spinner();
                }
                if let Some(status) = self.controller.status() {
                    let color = if status.is_success() {
                        egui::Color32::from_rgb(80, 200, 120)
                    } else if status.is_error() {
                        egui::Color32::from_rgb(230, 80, 80)
                    } else {
                        egui::Color32::from_rgb(240, 190, 60)
                    };
                    ui.label(egui::RichText::new(status.text()).color(color).strong());
                }
            });
        });
    }

    fn show_console_panel(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.strong("Console Log");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("🗑 Clear").clicked() {
                    self.console_log.clear();
                    self.console_log.push(format!("[{}] Console cleared", timestamp_now()));
                }
            });
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for line in &self.console_log {
                    let color = if line.contains("[ERROR]") {
                        egui::Color32::RED
                    } else if line.contains("[WARN]") {
                        egui::Color32::YELLOW
                    } else if line.contains("[INFO]") {
                        egui::Color32::LIGHT_BLUE
                    } else if line.contains("[PLAY]") {
                        egui::Color32::GREEN
                    } else if line.contains("[PAY]") {
                        egui::Color32::GOLD
                    } else {
                        egui::Color32::GRAY
                    };

                    ui.label(egui::RichText::new(line).monospace().color(color));
                }
            });
    }

    fn show_marketing(&mut self, ui: &mut egui::Ui) {
        let t = self.strings();
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.heading(egui::RichText::new(t.landing_title).size(36.0).color(egui::Color32::GOLD));
            ui.add_space(12.0);
            ui.label(egui::RichText::new(t.landing_subtitle).size(18.0));
            ui.add_space(30.0);
            ui.horizontal(|ui| {
                if ui.button(format!("👉 {}", t.join_now)).clicked() {
                    let url = self.config.community_url.clone();
                    self.open_in_browser(&url);
                }
                if ui.button(format!("🌐 {}", t.visit_site)).clicked() {
                    self.screen = Screen::Landing;
                }
            });
            ui.add_space(60.0);
            ui.weak(t.teaser_text);
        });
    }

    fn show_landing(&mut self, ui: &mut egui::Ui) {
        let t = self.strings();
        let teaser = self.controller.teaser().cloned();
        let grid: Vec<String> = self
            .controller
            .landing_grid(6)
            .into_iter()
            .map(|v| v.title.clone())
            .collect();

        ui.vertical_centered(|ui| {
            ui.add_space(30.0);
            if let Some(teaser) = &teaser {
                ui.label(egui::RichText::new(&teaser.title).size(20.0).strong());
                if ui.button(t.play).clicked() {
                    self.play_video(teaser, true);
                }
                ui.add_space(16.0);
            }

            ui.heading(t.welcome);
            ui.label(t.welcome_text);
            ui.add_space(16.0);

            egui::Grid::new("landing_grid")
                .num_columns(3)
                .spacing([24.0, 12.0])
                .show(ui, |ui| {
                    for (i, title) in grid.iter().enumerate() {
                        ui.label(egui::RichText::new(format!("🔒 {}", title)).weak());
                        if i % 3 == 2 {
                            ui.end_row();
                        }
                    }
                });

            ui.add_space(16.0);
            ui.weak(t.teaser_text);
            ui.add_space(16.0);
            if ui.button(egui::RichText::new(t.enter_site).size(18.0)).clicked() {
                self.screen = Screen::Gallery;
            }
        });
    }

    fn show_payment_return(&mut self, ui: &mut egui::Ui) {
        let t = self.strings();
        let Some(ret) = &self.payment_return else {
            return;
        };
        let state = ret.state();
        let message = ret.message(t);

        ui.vertical_centered(|ui| {
            ui.add_space(160.0);
            if state == ReturnState::Verifying {
                ui.spinner();
            }
            ui.label(egui::RichText::new(message).size(22.0));
            if matches!(state, ReturnState::Failed | ReturnState::MissingParams) {
                ui.add_space(20.0);
                if ui.button(t.back_to_site).clicked() {
                    self.payment_return = None;
                    self.screen = Screen::Gallery;
                    self.initialize(Location::default());
                }
            }
        });
    }

    fn show_gallery(&mut self, ui: &mut egui::Ui) {
        let t = self.strings();
        ui.heading(t.title);
        ui.add_space(6.0);

        match self.controller.view_state() {
            ViewState::Visitor => self.show_auth_form(ui),
            state => self.show_member_bar(ui, state),
        }
        ui.separator();

        ui.heading(t.videos_heading);
        let videos = self.controller.page_videos().to_vec();
        if videos.is_empty() {
            if !self.controller.is_pending(RequestKind::Videos) {
                ui.label(t.no_videos);
            }
            return;
        }

        let state = self.controller.view_state();
        let backend_url = self.controller.context().backend_url.clone();
        let busy_download = self.controller.is_pending(RequestKind::Download);
        let busy_payment = self.controller.is_pending(RequestKind::Payment);
        let mut action = None;

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .max_height(ui.available_height() - 40.0)
            .show(ui, |ui| {
                egui::Grid::new("video_grid")
                    .num_columns(3)
                    .spacing([16.0, 16.0])
                    .show(ui, |ui| {
                        for (i, video) in videos.iter().enumerate() {
                            let enabled = if state.is_subscribed() { !busy_download } else { !busy_payment };
                            if let Some(a) = video_card(ui, t, video, state, &backend_url, enabled) {
                                action = Some(a);
                            }
                            if i % 3 == 2 {
                                ui.end_row();
                            }
                        }
                    });
            });

        match action {
            Some(CardAction::Play(video)) => self.play_video(&video, false),
            Some(CardAction::Download(file)) => self.download_video(&file),
            Some(CardAction::Subscribe) => self.start_payment(),
            None => {}
        }

        self.show_pagination(ui);
    }

    fn show_auth_form(&mut self, ui: &mut egui::Ui) {
        let t = self.strings();
        let busy = self.controller.is_pending(RequestKind::Auth);
        let mut submit = false;

        ui.horizontal(|ui| {
            ui.add_enabled_ui(!busy, |ui| {
                ui.add(egui::TextEdit::singleline(&mut self.email_input).hint_text(t.email_hint).desired_width(220.0));
                let password = ui.add(
                    egui::TextEdit::singleline(&mut self.password_input)
                        .hint_text(t.password_hint)
                        .password(true)
                        .desired_width(180.0),
                );
                if password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }
                let label = match self.auth_mode {
                    AuthMode::Login => t.login,
                    AuthMode::Signup => t.signup,
                };
                if ui.button(label).clicked() {
                    submit = true;
                }
            });
            if busy {
                ui.spinner();
            }
        });

        let toggle = match self.auth_mode {
            AuthMode::Login => t.switch_to_signup,
            AuthMode::Signup => t.switch_to_login,
        };
        if ui.link(toggle).clicked() {
            self.auth_mode = self.auth_mode.toggled();
        }

        if submit && !busy {
            self.submit_credentials();
        }
    }

    fn show_member_bar(&mut self, ui: &mut egui::Ui, state: ViewState) {
        let t = self.strings();
        let email = self
            .controller
            .session()
            .map(|s| s.user.email.clone())
            .unwrap_or_default();
        let mut logout = false;
        let mut pay = false;

        ui.horizontal(|ui| {
            if state.is_member() {
                ui.label(format!("{} {}", t.logged_in_as, email));
            }
            let badge = if state.is_subscribed() {
                egui::RichText::new(t.subscribed_badge).color(egui::Color32::from_rgb(80, 200, 120))
            } else {
                egui::RichText::new(t.locked_badge).color(egui::Color32::GOLD)
            };
            ui.label(badge);
            if ui.button(t.logout).clicked() {
                logout = true;
            }
        });

        if state == ViewState::MemberLocked {
            ui.horizontal(|ui| {
                ui.label(t.unlock_notice);
                let busy = self.controller.is_pending(RequestKind::Payment);
                if ui.add_enabled(!busy, egui::Button::new(t.pay_button)).clicked() {
                    pay = true;
                }
            });
        }

        if pay {
            self.start_payment();
        }
        if logout {
            self.controller.logout(Utc::now());
            self.password_input.clear();
            self.log("[INFO] Logged out");
        }
    }

    fn show_pagination(&mut self, ui: &mut egui::Ui) {
        let t = self.strings();
        let pagination = *self.controller.pagination();
        if pagination.total_pages() <= 1 {
            return;
        }

        let mut target = None;
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.add_enabled(pagination.has_prev(), egui::Button::new(t.previous)).clicked() {
                target = Some(pagination.current() - 1);
            }
            ui.label(format!("{} {} / {}", t.page, pagination.current(), pagination.total_pages()));
            if ui.add_enabled(pagination.has_next(), egui::Button::new(t.next)).clicked() {
                target = Some(pagination.current() + 1);
            }
        });

        if let Some(page) = target {
            self.controller.set_page(page);
            info!(location = %self.controller.location().to_relative_url(), "page changed");
            self.save_config();
        }
    }
}

fn browser_link(url: &str) -> egui::OpenUrl {
    egui::OpenUrl::new_tab(url)
}

/// One gallery card. Subscribed members get play and download; everyone
/// else gets the subscription action.
fn video_card(
    ui: &mut egui::Ui,
    t: &Strings,
    video: &VideoRecord,
    state: ViewState,
    backend_url: &str,
    enabled: bool,
) -> Option<CardAction> {
    let mut action = None;
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(240.0);
        ui.vertical(|ui| {
            ui.label(egui::RichText::new(&video.title).strong());
            if state.is_subscribed() {
                let url = video.playback_url(backend_url);
                let preview = video.thumbnail_url(backend_url).unwrap_or(url);
                ui.weak(preview);
                ui.horizontal(|ui| {
                    if ui.button(t.play).clicked() {
                        action = Some(CardAction::Play(video.clone()));
                    }
                    let download = ui
                        .add_enabled(enabled, egui::Button::new(t.download))
                        .on_hover_text(video.file_name());
                    if download.clicked() {
                        action = Some(CardAction::Download(video.file_path.clone()));
                    }
                });
            } else {
                ui.weak(format!("🔒 {}", t.locked_badge));
                if ui
                    .add_enabled(enabled, egui::Button::new(t.subscription_required))
                    .clicked()
                {
                    action = Some(CardAction::Subscribe);
                }
            }
        });
    });
    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_link_keeps_full_query() {
        let url = "https://www.paypal.com/checkoutnow?token=EC-1&useraction=commit";
        let link = browser_link(url);
        assert_eq!(link.url, url);
        assert!(link.new_tab);
    }

    #[test]
    fn test_button_labels_carry_a_single_icon() {
        for language in [Language::Fr, Language::En, Language::De, Language::Es, Language::It] {
            let t = Strings::for_language(language);
            for label in [t.play, t.download, t.subscription_required, t.videos_heading, t.previous, t.next] {
                let icons = label.chars().filter(|c| !c.is_alphanumeric() && !c.is_whitespace() && !c.is_ascii_punctuation()).count();
                assert_eq!(icons, 1, "{label}");
            }
        }
    }
}
