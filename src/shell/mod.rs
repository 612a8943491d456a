pub mod prompt;

use std::io::{BufRead, Write};

use colored::Colorize;
use eyre::Result;
use log::{error, info};

use crate::models::vacancy::{SearchCriteria, SortBy};
use crate::providers::{self, Provider, ProviderKind};
use crate::regions::{RegionDirectory, resolve};
use crate::utils::config::Config;
use crate::utils::text::plural;
use crate::vacancies::fetcher::VacancyFetcher;
use crate::vacancies::presenter::{Presentation, Presenter};

use prompt::Prompt;

const DEFAULT_NAME: &str = "Пользователь";
const VACANCY_FORMS: [&str; 3] = ["вакансия", "вакансии", "вакансий"];
const FOUND_FORMS: [&str; 3] = ["найдена", "найдены", "найдено"];

/// Why an interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// All requested listings were shown.
    Finished,
    /// The user chose to leave from a menu or while paging.
    Quit,
}

/// Turns a step's `None` (user left) into an early `SessionEnd::Quit`.
macro_rules! or_quit {
    ($step:expr) => {
        match $step? {
            Some(value) => value,
            None => return Ok(SessionEnd::Quit),
        }
    };
}

/// The interactive menu flow: pick a service, region and filters, fetch, then
/// page through the results.
pub struct Shell<R, W> {
    config: Config,
    one_at_a_time: bool,
    prompt: Prompt<R, W>,
    name: String,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(config: Config, one_at_a_time: bool, input: R, output: W) -> Self {
        Self {
            config,
            one_at_a_time,
            prompt: Prompt::new(input, output),
            name: DEFAULT_NAME.to_string(),
        }
    }

    /// Runs a whole session and says goodbye however it ended.
    pub async fn run(&mut self) -> Result<SessionEnd> {
        let end = self.session().await;
        self.finish(end)
    }

    /// Says goodbye, then hands back the session outcome, errors included.
    fn finish(&mut self, end: Result<SessionEnd>) -> Result<SessionEnd> {
        match &end {
            Ok(end) => info!("session ended: {:?}", end),
            Err(e) => error!("session failed: {:#}", e),
        }
        self.farewell()?;
        end
    }

    async fn session(&mut self) -> Result<SessionEnd> {
        self.greet()?;

        let kind = or_quit!(self.choose_provider());
        let provider = providers::build(kind, &self.config)?;
        self.search(provider.as_ref()).await
    }

    fn farewell(&mut self) -> Result<()> {
        self.prompt.say(format!("\nДо свидания, {}! 👋", self.name))?;
        self.prompt.say("Работа программы завершена.")
    }

    fn greet(&mut self) -> Result<()> {
        let answer = self.prompt.ask(
            "\nЗдравствуйте! Наша программа поможет Вам изучить имеющиеся вакансии,\n\
             предлагаемые работодателями на территории Российской Федерации,\n\
             размещённые на сервисах HeadHunter (hh.ru) и SuperJob (superjob.ru).\n\n\
             Как Вас зовут? ",
        )?;

        match answer.filter(|name| !name.is_empty()) {
            Some(name) => {
                self.prompt.say(format!("Очень приятно, {name}. 🤝\n"))?;
                self.name = name;
            }
            None => {
                self.name = DEFAULT_NAME.to_string();
                self.prompt
                    .say(format!("Хорошо, будем называть Вас {}. 👌\n", self.name))?;
            }
        }
        Ok(())
    }

    fn retry_message(&self) -> String {
        format!("{}, Вы ввели некорректную команду. Попробуйте ещё раз.", self.name)
    }

    fn choose_provider(&mut self) -> Result<Option<ProviderKind>> {
        let retry = self.retry_message();
        let choice = self.prompt.menu(
            "\nВыберите сервис, с которого хотите получить информацию.\n\
             Для этого введите:\n   \
             ✅ HeadHunter (hh.ru)........ - 1\n   \
             ✅ SuperJob (superjob.ru).... - 2\n   \
             ❌ Завершить работу программы - 0.\n\n\
             Введите команду: ",
            &[1, 2],
            &retry,
        )?;

        let kind = match choice {
            Some(1) => ProviderKind::HeadHunter,
            Some(_) => ProviderKind::SuperJob,
            None => return Ok(None),
        };
        self.prompt
            .say(format!("\n{}, Вы выбрали {}. 👌\n", self.name, kind).green())?;
        Ok(Some(kind))
    }

    /// Everything after the provider is known.
    async fn search(&mut self, provider: &dyn Provider) -> Result<SessionEnd> {
        let data_dir = self.config.storage.data_dir.clone();
        let settings = provider.settings().clone();

        let directory = RegionDirectory::open(provider, &data_dir)?;
        directory.refresh(provider).await?;

        let area_id = or_quit!(self.choose_area(&directory));
        let mut keyword = or_quit!(self.ask_keyword());
        let only_salaried = or_quit!(self.choose_salary_only());
        let (min_salary, sort_by) = if only_salaried {
            let min_salary = or_quit!(
                self.prompt
                    .positive("\nУкажите ожидаемый размер заработной платы (в рублях): ")
            );
            (min_salary, or_quit!(self.choose_sort()))
        } else {
            (0, SortBy::Date)
        };

        let fetcher = VacancyFetcher::new(provider, &data_dir, self.config.http.request_delay())?;
        let total = loop {
            let criteria = SearchCriteria {
                keyword: keyword.clone(),
                area_id,
                only_salaried,
                min_salary,
                page_size: settings.page_size,
                sort_by,
            };

            self.prompt.say(
                "Мы собираем для Вас информацию о вакансиях в указанном регионе/населённом пункте..."
                    .cyan(),
            )?;
            let total = fetcher
                .fetch_all(&criteria, |done, max| {
                    self.prompt
                        .progress(format!("Подождите, пожалуйста. Анализируем страницы: {done}/{max}"))
                })
                .await?;
            self.prompt.say("")?;
            if total > 0 {
                self.prompt.say(format!(
                    "\nПо вашему запросу на {} {} {} {}.\n",
                    provider.kind().domain(),
                    plural(total, FOUND_FORMS),
                    total,
                    plural(total, VACANCY_FORMS)
                ))?;
                break total;
            }

            self.prompt.say(
                "\nИзвините. Мы ничего не нашли по Вашему запросу. \
                 Попробуйте его сформулировать по-другому.\n"
                    .yellow(),
            )?;
            keyword = or_quit!(self.reselect_keyword());
        };

        let count = or_quit!(self.ask_count(total));

        let presenter = Presenter::open(provider.kind(), &data_dir, settings.wrap_width)?;
        let (input, output) = self.prompt.parts();
        match presenter.print(count, sort_by, self.one_at_a_time, input, output)? {
            Presentation::Completed => Ok(SessionEnd::Finished),
            Presentation::Quit => Ok(SessionEnd::Quit),
        }
    }

    fn choose_area(&mut self, directory: &RegionDirectory) -> Result<Option<u64>> {
        let root = directory.load()?;
        let retry = self.retry_message();

        loop {
            let Some(place) = self.prompt.ask(
                "\nДля поиска вакансий введите, пожалуйста, название одного региона или города России\n\
                 без указания кратких обозначений \"г.\", \"с.\", \"х.\" и т.д., например:\n\
                 Москва, Санкт-Петербург, Ростовская область, Ростов-на-Дону.\n\
                 Введите название региона/населённого пункта: ",
            )?
            else {
                return Ok(None);
            };

            let area_id = resolve(&place, &root);
            if area_id != root.id {
                return Ok(Some(area_id));
            }

            let choice = self.prompt.menu(
                "\nМы не нашли, указанный Вами регион/населённый пункт, в имеющейся базе.\n\
                 Можем показать вакансии, имеющиеся в России.\n\
                 Чтобы продолжить введите одну из следующих команд:\n   \
                 ✅ Выбрать другой регион/населённый пункт - 1\n   \
                 ✅ Показать вакансии в России............ - 2\n   \
                 ❌ Завершить работу программы............ - 0\n\n\
                 Введите команду: ",
                &[1, 2],
                &retry,
            )?;
            match choice {
                Some(1) => self
                    .prompt
                    .say(format!("\n{}, введите другой регион/населённый пункт.", self.name))?,
                Some(_) => {
                    self.prompt.say(format!(
                        "\n{}, мы подберём для Вас вакансии на территории России.",
                        self.name
                    ))?;
                    return Ok(Some(root.id));
                }
                None => return Ok(None),
            }
        }
    }

    fn ask_keyword(&mut self) -> Result<Option<String>> {
        let question = format!(
            "\n{}, введите ключевое слово, по которому мы будем осуществлять поиск вакансий.\n\
             Например: водитель, программист, python, java и т.д.\n\n\
             Должность: ",
            self.name
        );
        Ok(self.prompt.ask(&question)?.map(|keyword| keyword.to_lowercase()))
    }

    fn reselect_keyword(&mut self) -> Result<Option<String>> {
        let retry = self.retry_message();
        let choice = self.prompt.menu(
            "\nВыберите одну из команд:\n   \
             ✅ Ввести наименование должности заново - 1\n   \
             ❌ Завершить работу программы........... - 0\n\n\
             Введите команду: ",
            &[1],
            &retry,
        )?;
        if choice.is_none() {
            return Ok(None);
        }

        let question = format!("\n{}, введите должность: ", self.name);
        Ok(self.prompt.ask(&question)?.map(|keyword| keyword.to_lowercase()))
    }

    fn choose_salary_only(&mut self) -> Result<Option<bool>> {
        let retry = self.retry_message();
        let choice = self.prompt.menu(
            "\nВыберите одну из команд:\n   \
             ✅ Показать вакансии только с указанием зарплаты - 1\n   \
             ✅ Показать все имеющиеся вакансии.............. - 2\n   \
             ❌ Завершить работу программы................... - 0\n\n\
             Введите команду: ",
            &[1, 2],
            &retry,
        )?;
        Ok(choice.map(|choice| choice == 1))
    }

    fn choose_sort(&mut self) -> Result<Option<SortBy>> {
        let retry = self.retry_message();
        let choice = self.prompt.menu(
            "\nКак нам отсортировать вакансии?\n   \
             ✅ По заработной плате (по убыванию)  - 1\n   \
             ✅ По дате публикации (по убыванию).. - 2\n   \
             ❌ Завершить работу программы........ - 0\n\n\
             Введите команду: ",
            &[1, 2],
            &retry,
        )?;
        Ok(choice.map(|choice| if choice == 1 { SortBy::Salary } else { SortBy::Date }))
    }

    /// Reads how many listings to show. Anything that isn't a number up to
    /// `total` shows them all.
    fn ask_count(&mut self, total: u64) -> Result<Option<usize>> {
        let Some(answer) = self.prompt.ask(&format!(
            "Какое количество вакансий из найденных ({total} шт.) Вы бы хотели увидеть? "
        ))?
        else {
            return Ok(None);
        };

        let count = match answer.parse::<u64>() {
            Ok(count) if count <= total => {
                self.prompt.say(format!(
                    "\nНиже будут представлены вакансии, которые мы нашли по Вашему запросу ({count} шт.).\n"
                ))?;
                count
            }
            _ => {
                self.prompt.say(format!(
                    "\nВы ввели некорректные данные, поэтому мы покажем Вам все найденные вакансии ({total} шт.).\n"
                ))?;
                total
            }
        };
        Ok(Some(usize::try_from(count)?))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;
    use crate::models::region::RegionNode;
    use crate::providers::fake::{FakeProvider, page, raw};
    use crate::utils::config::ConfigInner;

    type TestShell = Shell<Cursor<String>, Vec<u8>>;

    fn shell(tmp: &TempDir, input: &str) -> TestShell {
        let mut config = ConfigInner::default();
        config.storage.data_dir = tmp.path().to_path_buf();
        config.http.request_delay_ms = 0;
        Shell::new(Arc::new(config), false, Cursor::new(input.to_string()), Vec::new())
    }

    fn output(shell: &mut TestShell) -> String {
        let (_, out) = shell.prompt.parts();
        String::from_utf8(out.clone()).unwrap()
    }

    fn provider(pages: Vec<crate::providers::SearchPage>) -> FakeProvider {
        let mut provider = FakeProvider::new(pages);
        provider.regions = Some(RegionNode::new(113, "Россия").with_children(vec![
            RegionNode::new(1530, "Ростовская область")
                .with_children(vec![RegionNode::new(76, "Ростов-на-Дону")]),
        ]));
        provider
    }

    #[tokio::test]
    async fn leaving_at_the_first_menu_says_goodbye() {
        let tmp = TempDir::new().unwrap();
        let mut shell = shell(&tmp, "\n0\n");

        assert_eq!(shell.run().await.unwrap(), SessionEnd::Quit);

        let text = output(&mut shell);
        assert!(text.contains("будем называть Вас Пользователь"));
        assert!(text.contains("До свидания, Пользователь! 👋"));
        assert!(text.contains("Работа программы завершена."));
    }

    #[tokio::test]
    async fn search_fetches_and_prints_requested_listings() {
        let tmp = TempDir::new().unwrap();
        let provider = provider(vec![page(
            vec![
                raw("водитель погрузчика", "2023-06-01T10:00:00+03:00", Some(50_000), None),
                raw("водитель такси", "2023-06-02T10:00:00+03:00", None, None),
            ],
            false,
        )]);
        let mut shell = shell(&tmp, "Ростов-на-Дону\nВодитель\n2\n1\n");

        let end = shell.search(&provider).await.unwrap();

        let text = output(&mut shell);
        assert_eq!(end, SessionEnd::Finished);
        assert!(text.contains("Анализируем страницы: 1/4"));
        assert!(text.contains("на hh.ru найдены 2 вакансии."));
        assert!(text.contains("№ 1, от 02.06.2023: водитель такси."));
        assert!(!text.contains("№ 2"));
        assert!(text.contains("Выведены все вакансии."));
    }

    #[tokio::test]
    async fn unknown_region_can_fall_back_to_the_whole_country() {
        let tmp = TempDir::new().unwrap();
        let provider = provider(vec![page(
            vec![raw("бухгалтер", "2023-06-01T10:00:00+03:00", Some(40_000), Some(60_000))],
            false,
        )]);
        let mut shell = shell(&tmp, "Атлантида\nabc\n2\nбухгалтер\n1\n45000\n1\nмного\n");

        let end = shell.search(&provider).await.unwrap();

        let text = output(&mut shell);
        assert_eq!(end, SessionEnd::Finished);
        assert!(text.contains("Мы не нашли"));
        assert!(text.contains("найдена 1 вакансия."));
        assert!(text.contains("покажем Вам все найденные вакансии (1 шт.)"));
        assert!(text.contains("№ 1, от 01.06.2023: бухгалтер."));
    }

    #[tokio::test]
    async fn empty_result_offers_to_quit() {
        let tmp = TempDir::new().unwrap();
        let provider = provider(vec![page(Vec::new(), false)]);
        let mut shell = shell(&tmp, "Ростов-на-Дону\nкосмонавт\n2\n0\n");

        let end = shell.search(&provider).await.unwrap();

        let text = output(&mut shell);
        assert_eq!(end, SessionEnd::Quit);
        assert!(text.contains("Мы ничего не нашли"));
        assert!(!text.contains("№ 1"));
        assert!(
            std::fs::read_dir(tmp.path().join("hh").join("vacancies"))
                .unwrap()
                .next()
                .is_none()
        );
    }

    #[tokio::test]
    async fn failed_area_download_still_says_goodbye() {
        let tmp = TempDir::new().unwrap();
        let provider = FakeProvider::new(Vec::new());
        let mut shell = shell(&tmp, "Ростов-на-Дону\n");

        let end = shell.search(&provider).await;
        let err = shell.finish(end).unwrap_err();

        let text = output(&mut shell);
        assert!(format!("{err:#}").contains(&provider.settings.areas_url));
        assert!(text.contains("До свидания, Пользователь! 👋"));
        assert!(text.contains("Работа программы завершена."));
    }
}
