//! Trimmed copies of the scraped pages, for parser and scraper tests.

pub const RANKINGS_PAGE: &str = r#"
    <html><body>
    <ol class="TableBody_list__P8yRn">
      <li class="TableBody_item__eCenH">
        <div class="TableBody_cell__rFrpm">
          <div class="TeamInfo_emblem__5JUAY"><img src="https://img.example/lg.png"></div>
          <div class="TeamInfo_ranking__MqHpq">1위</div>
          <div class="TeamInfo_team_name__dni7F">LG</div>
        </div>
        <div class="TableBody_cell__rFrpm"><span class="blind">승률</span>0.603</div>
        <div class="TableBody_cell__rFrpm"><span class="blind">게임차</span>-</div>
        <div class="TableBody_cell__rFrpm"><span class="blind">승</span>85</div>
        <div class="TableBody_cell__rFrpm"><span class="blind">무</span>3</div>
        <div class="TableBody_cell__rFrpm"><span class="blind">패</span>56</div>
      </li>
      <li class="TableBody_item__eCenH">
        <div class="TableBody_cell__rFrpm">
          <div class="TeamInfo_emblem__5JUAY"><img src="https://img.example/hh.png"></div>
          <div class="TeamInfo_ranking__MqHpq">2위</div>
          <div class="TeamInfo_team_name__dni7F">한화</div>
        </div>
        <div class="TableBody_cell__rFrpm">0.593</div>
        <div class="TableBody_cell__rFrpm"><span class="blind">게임차</span>1.5</div>
        <div class="TableBody_cell__rFrpm">83</div>
        <div class="TableBody_cell__rFrpm">3</div>
        <div class="TableBody_cell__rFrpm">57</div>
      </li>
      <li class="TableBody_item__eCenH">
        <div class="TableBody_cell__rFrpm">header row without stats</div>
      </li>
      <li class="TableBody_item__eCenH">
        <div class="TableBody_cell__rFrpm">
          <div class="TeamInfo_ranking__MqHpq">-</div>
          <div class="TeamInfo_team_name__dni7F">SSG</div>
        </div>
        <div class="TableBody_cell__rFrpm">0.500</div>
        <div class="TableBody_cell__rFrpm">10</div>
        <div class="TableBody_cell__rFrpm">70</div>
        <div class="TableBody_cell__rFrpm">4</div>
        <div class="TableBody_cell__rFrpm">70</div>
      </li>
    </ol>
    </body></html>
    "#;

pub const SCHEDULE_PAGE: &str = r#"
    <html><body>
    <ul class="game-list-n">
      <li class="game-cont" home_nm="LG" away_nm="두산" g_id="20250401OBLG0" g_dt="20250401">
        <div class="team away"><div class="emb"><img alt="두산"></div></div>
        <div class="team home"><div class="emb"><img alt="LG"></div></div>
      </li>
      <li class="game-cont">
        <div class="team away"><div class="emb"><img alt="KIA"></div></div>
        <div class="team home"><div class="emb"><img alt="한화"></div></div>
        <a href="/Schedule/GameCenter/Main.aspx?gameDate=20250401&amp;gameId=20250401HTHH0&amp;section=REVIEW">리뷰</a>
      </li>
      <li class="game-cont" g_id="20250401SKNC0" g_dt="20250401">
        <p class="top">18:30 창원</p>
        <p class="vs">SSG vs NC</p>
      </li>
      <li class="game-cont" home_nm="삼성" g_id="20250401KTSS0" g_dt="20250401">
        <div class="team away"><div class="emb"><img alt="KT"></div></div>
        <div class="team home"><div class="emb"><img alt="다른팀"></div></div>
      </li>
      <li class="game-cont">
        <p>우천 취소</p>
      </li>
    </ul>
    </body></html>
    "#;

pub const REVIEW_PAGE: &str = r#"
    <html><body>
    <div class="tab-cont">
      <div class="record-etc">
        <span>관중</span><span id="txtCrowd">23,750</span>
        <span>경기시간</span><span id="txtRunTime">3:07</span>
      </div>
    </div>
    </body></html>
    "#;

pub const RECENT_PAGE: &str = r#"
    <html><body>
    <ol class="TableBody_list__P8yRn">
      <li class="TableBody_item__eCenH">
        <div class="TeamInfo_team_name__dni7F">LG</div>
        <div class="ResultInfo_result__Vd3ZN"><span class="blind">승</span></div>
        <div class="ResultInfo_result__Vd3ZN"><span class="blind">승</span></div>
        <div class="ResultInfo_result__Vd3ZN"><span class="blind">패</span></div>
        <div class="ResultInfo_result__Vd3ZN"><span class="blind">무</span></div>
        <div class="ResultInfo_result__Vd3ZN"><span class="blind">승</span></div>
        <div class="ResultInfo_result__Vd3ZN"><span class="blind">패</span></div>
      </li>
      <li class="TableBody_item__eCenH">
        <div class="TeamInfo_team_name__dni7F">한화</div>
        <div class="ResultInfo_result__Vd3ZN"><span class="blind">패</span></div>
        <div class="ResultInfo_result__Vd3ZN"><span class="blind">취소</span></div>
        <div class="ResultInfo_result__Vd3ZN"><span class="blind">승</span></div>
      </li>
    </ol>
    </body></html>
    "#;
