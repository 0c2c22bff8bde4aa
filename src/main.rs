//! 程序入口：初始化日志与配置、启动异步运行时、加载 Slint UI 并绑定 VM

use std::{path::PathBuf, sync::Arc};

use slint::{ComponentHandle, ModelRc, SharedString, VecModel};
use tokio::runtime::{Handle, Runtime};
use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

use pseudo_translator::{
    model::output_view::render_output,
    utils::{clipboard::SystemClipboard, fs::FileHandle},
    vm::bridge::*,
    AppConfig, HttpTranslationService, LanguageSelection, TargetLanguage, TranslationController,
    WorkflowSnapshot,
};

slint::include_modules!();

/// VM桥接器：管理UI与翻译控制器的交互
struct ViewModelBridge {
    controller: TranslationController,
    runtime: Handle,
}

impl ViewModelBridge {
    /// 创建新的VM桥接器并绑定所有回调
    fn new(app_window: &AppWindow, controller: TranslationController, runtime: Handle) -> Self {
        let bridge = Self { controller, runtime };
        bridge.setup_callbacks(app_window);
        bridge.forward_snapshots(app_window);
        bridge.forward_language(app_window);
        bridge
    }

    /// 设置所有UI回调函数
    fn setup_callbacks(&self, app_window: &AppWindow) {
        // === 输入编辑 ===
        {
            let controller = self.controller.clone();
            app_window.on_input_edited(move |text| {
                controller.set_input(text.to_string());
            });
        }

        // === 上传文件 ===
        {
            let controller = self.controller.clone();
            let runtime = self.runtime.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_upload_pressed(move || {
                let Some(path) = Self::show_open_dialog() else {
                    if let Some(app_window) = app_window_weak.upgrade() {
                        app_window.set_status_message(STATUS_NO_FILE.into());
                    }
                    return;
                };
                let controller = controller.clone();
                runtime.spawn(async move {
                    // 失败原因已记录在状态中，随快照显示
                    let _ = controller.upload_file(&FileHandle::new(path)).await;
                });
            });
        }

        // === 翻译 ===
        {
            let controller = self.controller.clone();
            let runtime = self.runtime.clone();
            app_window.on_translate_pressed(move || {
                let controller = controller.clone();
                runtime.spawn(async move {
                    controller.translate().await;
                });
            });
        }

        // === 语言选择 ===
        {
            let controller = self.controller.clone();
            app_window.on_language_selected(move |index| {
                match usize::try_from(index).ok().and_then(TargetLanguage::from_index) {
                    Some(language) => controller.select_language(language),
                    None => tracing::warn!(index, "未知的语言选项"),
                }
            });
        }

        // === 导出格式选择 ===
        {
            let controller = self.controller.clone();
            app_window.on_format_selected(move |label| {
                controller.set_file_format(format_from_label(&label));
            });
        }

        // === 复制 ===
        {
            let controller = self.controller.clone();
            let runtime = self.runtime.clone();
            app_window.on_copy_pressed(move || {
                let controller = controller.clone();
                runtime.spawn(async move {
                    controller.copy_output().await;
                });
            });
        }

        // === 下载 ===
        {
            let controller = self.controller.clone();
            let runtime = self.runtime.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_download_pressed(move || {
                let Some(file_name) = controller.suggested_file_name() else {
                    return;
                };
                let Some(path) = Self::show_save_dialog(&file_name) else {
                    return;
                };
                let controller = controller.clone();
                let app_window_weak = app_window_weak.clone();
                runtime.spawn(async move {
                    if let Some(saved) = controller.save_output_as(&path).await {
                        let message = format!("{}{}", STATUS_SAVED_PREFIX, saved.display());
                        let _ = app_window_weak.upgrade_in_event_loop(move |app_window| {
                            app_window.set_status_message(message.into());
                        });
                    }
                });
            });
        }

        // === 关闭错误提示 ===
        {
            let controller = self.controller.clone();
            app_window.on_dismiss_error(move || {
                controller.dismiss_error();
            });
        }

        // === 显示空格 ===
        {
            let controller = self.controller.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_whitespace_toggled(move |show| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    let snapshot = controller.snapshot();
                    app_window.set_output_text(render_output(&snapshot.output, show).into());
                }
            });
        }
    }

    /// 订阅控制器快照，在UI线程上刷新界面
    fn forward_snapshots(&self, app_window: &AppWindow) {
        let mut rx = self.controller.subscribe();
        let mut previous = rx.borrow_and_update().clone();
        let app_window_weak = app_window.as_weak();
        self.runtime.spawn(async move {
            while rx.changed().await.is_ok() {
                let snapshot = rx.borrow_and_update().clone();
                let refresh = ViewRefresh::between(&previous, &snapshot);
                previous = snapshot.clone();
                if app_window_weak
                    .upgrade_in_event_loop(move |app_window| {
                        Self::apply_snapshot(&app_window, &snapshot, refresh)
                    })
                    .is_err()
                {
                    tracing::info!("事件循环已退出，停止同步界面");
                    break;
                }
            }
        });
    }

    /// 语言下拉框直接订阅共享的语言单元
    fn forward_language(&self, app_window: &AppWindow) {
        let mut rx = self.controller.language().subscribe();
        let app_window_weak = app_window.as_weak();
        self.runtime.spawn(async move {
            while rx.changed().await.is_ok() {
                let index = rx.borrow_and_update().index() as i32;
                if app_window_weak
                    .upgrade_in_event_loop(move |app_window| app_window.set_language_index(index))
                    .is_err()
                {
                    break;
                }
            }
        });
    }

    /// 初始化UI状态
    fn initialize_ui(&self, app_window: &AppWindow) {
        let labels: Vec<SharedString> = language_labels().into_iter().map(Into::into).collect();
        app_window.set_language_labels(ModelRc::new(VecModel::from(labels)));
        app_window.set_language_index(self.controller.language().current().index() as i32);
        app_window.set_show_whitespace(false);
        Self::apply_snapshot(app_window, &self.controller.snapshot(), ViewRefresh::ALL);
    }

    fn apply_snapshot(app_window: &AppWindow, snapshot: &WorkflowSnapshot, refresh: ViewRefresh) {
        if refresh.input {
            app_window.set_input_text(snapshot.input.as_str().into());
        }

        if refresh.formats {
            let formats: Vec<SharedString> = snapshot
                .export_formats
                .iter()
                .map(|f| format_label(f).into())
                .collect();
            app_window.set_format_options(ModelRc::new(VecModel::from(formats)));
            app_window.set_file_format(format_label(&snapshot.file_format).into());
        }

        if refresh.output {
            let output = render_output(&snapshot.output, app_window.get_show_whitespace());
            app_window.set_output_text(output.into());
        }

        app_window.set_error_message(snapshot.error.clone().unwrap_or_default().into());
        app_window.set_copy_label(snapshot.copy_label.as_str().into());
        app_window.set_status_message(status_for(snapshot.phase).into());
        app_window.set_busy(snapshot.busy());
        app_window.set_can_copy(snapshot.can_copy());
        app_window.set_can_download(snapshot.can_download());
    }

    /// 显示文件选择对话框
    fn show_open_dialog() -> Option<PathBuf> {
        use rfd::FileDialog;

        let file_path = FileDialog::new()
            .add_filter("Text files", &["txt"])
            .add_filter("All files", &["*"])
            .set_title("Load pseudocode")
            .pick_file();

        match file_path {
            Some(path) => {
                tracing::info!("用户选择了文件: {}", path.display());
                Some(path)
            }
            None => {
                tracing::info!("用户取消了文件选择");
                None
            }
        }
    }

    /// 显示保存对话框，默认文件名为 output.<格式>
    fn show_save_dialog(file_name: &str) -> Option<PathBuf> {
        use rfd::FileDialog;

        let path = FileDialog::new()
            .set_file_name(file_name)
            .set_title("Save translated code")
            .save_file();
        if path.is_none() {
            tracing::info!("用户取消了保存");
        }
        path
    }
}

fn init_tracing() {
    // 默认 info 级别，可通过 RUST_LOG 覆盖
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = SubscriberBuilder::default().with_env_filter(filter).try_init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load()?;
    let runtime = Runtime::new()?;

    let service = HttpTranslationService::new(&config.service_url, config.request_timeout())?;
    tracing::info!(endpoint = service.endpoint(), "翻译服务已配置");

    let controller = TranslationController::new(
        Arc::new(service),
        Arc::new(SystemClipboard),
        LanguageSelection::new(config.default_language),
        config.request_timeout(),
    );

    let app = AppWindow::new()?;
    let bridge = ViewModelBridge::new(&app, controller, runtime.handle().clone());
    bridge.initialize_ui(&app);

    tracing::info!("应用启动成功，UI已初始化");
    app.run()?;
    Ok(())
}
