mod helpers;

use std::fs;

use anyhow::Result;
use camino::Utf8Path;
use devstrap::DevstrapError;
use devstrap::config::{PackageSpec, Profile};
use devstrap::executor::RealCommandExecutor;
use devstrap::task::TaskContext;
use devstrap::workdir::WorkDir;
use devstrap::workflow::{Step, Workflow};
use helpers::{MockExecutor, ScriptedPrompter, argv, temp_dir};

fn profile_in(home: &Utf8Path) -> Profile {
    Profile::new(home, "dev", "/bin/zsh")
}

fn package(name: &str, url: Option<&str>) -> PackageSpec {
    PackageSpec {
        name: name.to_string(),
        url: url.map(str::to_string),
    }
}

#[test]
fn test_packages_step_downloads_then_installs() -> Result<()> {
    let (_dir, home) = temp_dir();
    let workdir = WorkDir::create_in(&home)?;
    let mut profile = profile_in(&home);
    profile.packages = vec![
        package("htop", None),
        package("ripgrep", Some("https://example.com/dl/ripgrep_14.1.0-1_amd64.deb")),
    ];

    let executor = MockExecutor::new()
        .with_exit_code("dpkg-query", 1)
        .creating_downloads();
    let prompter = ScriptedPrompter::default();
    let ctx = TaskContext::new(&executor, &prompter, false);

    Workflow::with_steps(&profile, &[Step::Packages]).run(&ctx, workdir.path())?;

    let deb = workdir.path().join("ripgrep_14.1.0-1_amd64.deb");
    assert_eq!(
        executor.calls(),
        vec![
            argv(&["sudo", "dpkg-query", "--status", "htop"]),
            argv(&["sudo", "apt", "install", "--yes", "htop"]),
            argv(&[
                "curl",
                "-L",
                "https://example.com/dl/ripgrep_14.1.0-1_amd64.deb",
                "-o",
                deb.as_str()
            ]),
            argv(&["sudo", "dpkg-query", "--status", "ripgrep"]),
            argv(&["sudo", "apt", "install", "--yes", deb.as_str()]),
        ]
    );
    Ok(())
}

#[test]
fn test_neovim_step_installs_into_home_without_elevation() -> Result<()> {
    let (_dir, home) = temp_dir();
    fs::write(home.join(".zshrc"), "")?;
    let workdir = WorkDir::create_in(&home)?;
    let profile = profile_in(&home);

    let executor = MockExecutor::new().creating_downloads();
    let prompter = ScriptedPrompter::default();
    let ctx = TaskContext::new(&executor, &prompter, false);

    Workflow::with_steps(&profile, &[Step::Neovim]).run(&ctx, workdir.path())?;

    let archive = workdir.path().join("nvim-linux-x86_64.tar.gz");
    let share = home.join(".local/share");
    assert_eq!(
        executor.calls(),
        vec![
            argv(&["curl", "-L", &profile.neovim.url, "-o", archive.as_str()]),
            argv(&["tar", "xzf", archive.as_str(), "-C", share.as_str()]),
        ]
    );
    assert_eq!(fs::read_to_string(home.join(".zshrc"))?, profile.neovim_path_line());
    assert!(prompter.questions().is_empty());
    Ok(())
}

#[test]
fn test_declined_overwrite_skips_step() -> Result<()> {
    let (_dir, home) = temp_dir();
    fs::create_dir(home.join(".oh-my-zsh"))?;
    let workdir = WorkDir::create_in(&home)?;
    let profile = profile_in(&home);

    let executor = MockExecutor::new();
    let prompter = ScriptedPrompter::new([false]);
    let ctx = TaskContext::new(&executor, &prompter, false);

    Workflow::with_steps(&profile, &[Step::OhMyZsh]).run(&ctx, workdir.path())?;

    assert_eq!(prompter.questions().len(), 1);
    assert!(executor.calls().is_empty());
    assert!(home.join(".oh-my-zsh").is_dir());
    Ok(())
}

#[test]
fn test_accepted_overwrite_deletes_then_installs() -> Result<()> {
    let (_dir, home) = temp_dir();
    let lsp_dir = home.join(".config/nvim/pack/nvim/start");
    fs::create_dir_all(lsp_dir.join("nvim-lspconfig"))?;
    let workdir = WorkDir::create_in(&home)?;
    let profile = profile_in(&home);

    let executor = MockExecutor::new();
    let prompter = ScriptedPrompter::new([true]);
    let ctx = TaskContext::new(&executor, &prompter, false);

    Workflow::with_steps(&profile, &[Step::NeovimLsp]).run(&ctx, workdir.path())?;

    let target = lsp_dir.join("nvim-lspconfig");
    assert_eq!(
        executor.calls(),
        vec![
            argv(&["rm", "-rf", target.as_str()]),
            argv(&["git", "clone", &profile.neovim.lsp_url, target.as_str()]),
        ]
    );
    Ok(())
}

#[test]
fn test_dotfiles_step_installs_only_confirmed_entries() -> Result<()> {
    let (_dir, home) = temp_dir();
    let nvim = home.join(".config/nvim");
    fs::create_dir_all(&nvim)?;
    fs::write(nvim.join("init.lua"), "-- mine\n")?;
    let workdir = WorkDir::create_in(&home)?;
    let profile = profile_in(&home);

    let executor = MockExecutor::new();
    let prompter = ScriptedPrompter::new([false]);
    let ctx = TaskContext::new(&executor, &prompter, false);

    Workflow::with_steps(&profile, &[Step::Dotfiles]).run(&ctx, workdir.path())?;

    let clone_dir = workdir.path().join("dotfiles");
    assert_eq!(
        executor.calls(),
        vec![
            argv(&["git", "clone", &profile.neovim.dotfiles_url, clone_dir.as_str()]),
            argv(&["mv", clone_dir.join("nvim/lua").as_str(), nvim.join("lua").as_str()]),
        ]
    );
    assert_eq!(fs::read_to_string(nvim.join("init.lua"))?, "-- mine\n");
    Ok(())
}

#[test]
fn test_node_step_runs_version_manager() -> Result<()> {
    let (_dir, home) = temp_dir();
    fs::write(home.join(".zshrc"), "")?;
    let workdir = WorkDir::create_in(&home)?;
    let profile = profile_in(&home);

    let executor = MockExecutor::new().creating_downloads();
    let prompter = ScriptedPrompter::default();
    let ctx = TaskContext::new(&executor, &prompter, false);

    Workflow::with_steps(&profile, &[Step::Node]).run(&ctx, workdir.path())?;

    let script = workdir.path().join("nvm_install.sh");
    assert_eq!(
        executor.programs(),
        vec!["curl", "chmod", "/bin/zsh", "/bin/zsh", "/bin/zsh"]
    );
    assert_eq!(
        executor.calls()[0],
        argv(&["curl", "-L", &profile.node.nvm_url, "-o", script.as_str()])
    );
    assert!(fs::read_to_string(home.join(".zshrc"))?.contains("export NVM_DIR"));
    Ok(())
}

#[test]
fn test_first_failure_aborts_remaining_steps() {
    let (_dir, home) = temp_dir();
    let workdir = WorkDir::create_in(&home).unwrap();
    let mut profile = profile_in(&home);
    profile.packages = vec![package("htop", None)];

    let executor = MockExecutor::new()
        .with_exit_code("dpkg-query", 1)
        .with_exit_code("apt", 100);
    let prompter = ScriptedPrompter::default();
    let ctx = TaskContext::new(&executor, &prompter, false);

    let err = Workflow::new(&profile).run(&ctx, workdir.path()).unwrap_err();

    assert!(format!("{:#}", err).contains("step 'packages' failed"), "got: {:#}", err);
    let cause = err.downcast_ref::<DevstrapError>().expect("typed cause");
    assert_eq!(cause.exit_code(), Some(100));
    assert_eq!(executor.programs(), vec!["dpkg-query", "apt"]);
}

#[test]
fn test_dry_run_leaves_home_untouched() -> Result<()> {
    let (_dir, root) = temp_dir();
    let home = root.join("home");
    fs::create_dir(&home)?;
    let workdir = WorkDir::create_in(&root)?;
    let profile = profile_in(&home);

    let executor = MockExecutor::new().with_exit_code("dpkg-query", 1);
    let prompter = ScriptedPrompter::default();
    let ctx = TaskContext::new(&executor, &prompter, true);

    Workflow::new(&profile).run(&ctx, workdir.path())?;

    assert_eq!(fs::read_dir(&home)?.count(), 0, "dry run must not write into home");
    let programs = executor.programs();
    for expected in ["apt", "curl", "tar", "git", "mv"] {
        assert!(programs.iter().any(|p| p == expected), "{} was not planned", expected);
    }
    assert!(prompter.questions().is_empty());
    Ok(())
}

#[test]
fn test_dry_run_plans_package_install_without_asking() -> Result<()> {
    let (_dir, home) = temp_dir();
    let workdir = WorkDir::create_in(&home)?;
    let mut profile = profile_in(&home);
    profile.packages = vec![package("devstrap-no-such-pkg", None)];

    let executor = RealCommandExecutor { dry_run: true };
    let prompter = ScriptedPrompter::default();
    let ctx = TaskContext::new(&executor, &prompter, true);

    Workflow::with_steps(&profile, &[Step::Packages]).run(&ctx, workdir.path())?;

    assert!(prompter.questions().is_empty(), "got: {:?}", prompter.questions());
    Ok(())
}
